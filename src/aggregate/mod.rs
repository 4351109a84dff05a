pub mod selection;
pub mod results;
pub mod aggregator;

pub use aggregator::{genre_totals, kpi, publisher_totals, region_totals, round2, top_games, yearly_series};
pub use results::{GenreTotals, Kpi, LabeledValues, Series, TopGames, YearlySeries, NO_DATA};
pub use selection::{SalesColumn, SalesSelection};
