use std::io::Write;
use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, info};
use crate::aggregate::{self, GenreTotals, Kpi, LabeledValues, SalesSelection, TopGames, YearlySeries};
use crate::analysis::extractor::NlExtractor;
use crate::analysis::vocabulary::Vocabulary;
use crate::core::config::Config;
use crate::core::dataset::{DatasetOptions, DatasetTable};
use crate::core::error::Result;
use crate::export;
use crate::query::cache::{CacheStats, QueryCache};
use crate::query::criteria::FilterCriteria;
use crate::query::filter::FilterEngine;
use crate::query::view::FilteredView;

/// Outcome of a free-text query: what was understood and how much it covers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NlFilterSummary {
    pub query: String,
    pub filters: FilterCriteria,
    pub total_games: usize,
    pub total_sales: f64,
}

/// Query entry point over one immutable dataset. Every method takes
/// `&self`; an `Arc<SalesEngine>` can serve any number of threads.
pub struct SalesEngine {
    config: Config,
    table: Arc<DatasetTable>,
    extractor: NlExtractor,
    filter: FilterEngine,
    cache: QueryCache,
}

impl SalesEngine {
    /// Load the dataset named by `config.dataset_path`
    pub fn open(config: Config) -> Result<Self> {
        let table = DatasetTable::load(&config.dataset_path)?;
        Self::new(Arc::new(table), config)
    }

    pub fn new(table: Arc<DatasetTable>, config: Config) -> Result<Self> {
        let vocabulary = Arc::new(Vocabulary::from_table(&table));
        info!(
            rows = table.len(),
            vocabulary = vocabulary.len(),
            cache_capacity = config.cache_capacity,
            "Sales engine ready"
        );

        Ok(SalesEngine {
            extractor: NlExtractor::new(vocabulary, config.extractor.clone()),
            filter: FilterEngine::new(&config)?,
            cache: QueryCache::new(config.cache_capacity),
            table,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn table(&self) -> &DatasetTable {
        &self.table
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.extractor.vocabulary()
    }

    pub fn options(&self) -> DatasetOptions {
        self.table.options()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Free text to criteria, using this dataset's vocabulary
    pub fn extract(&self, text: &str) -> FilterCriteria {
        self.extractor.extract(text)
    }

    /// Filtered view for `criteria`, reusing a cached row list when possible
    pub fn apply(&self, criteria: &FilterCriteria) -> FilteredView<'_> {
        if criteria.is_empty() {
            return FilteredView::full(&self.table);
        }

        let key = criteria.cache_key();
        if let Some(rows) = self.cache.get(&key) {
            debug!(rows = rows.len(), "Filtered view served from cache");
            return FilteredView::new(&self.table, rows);
        }

        let view = self.filter.apply(&self.table, criteria);
        debug!(rows = view.len(), facets = criteria.active_facets(), "Filtered view computed");
        self.cache.put(key, view.shared_rows());
        view
    }

    pub fn top_games(&self, criteria: &FilterCriteria) -> TopGames {
        let view = self.apply(criteria);
        aggregate::top_games(&view, &SalesSelection::from_criteria(criteria), self.config.top_n)
    }

    pub fn region_sales(&self, criteria: &FilterCriteria) -> LabeledValues {
        let view = self.apply(criteria);
        aggregate::region_totals(&view, criteria.regions.as_slice())
    }

    pub fn kpi(&self, criteria: &FilterCriteria) -> Kpi {
        aggregate::kpi(&self.apply(criteria))
    }

    pub fn yearly_sales(&self, criteria: &FilterCriteria) -> YearlySeries {
        let view = self.apply(criteria);
        aggregate::yearly_series(&view, &SalesSelection::from_criteria(criteria))
    }

    pub fn genre_sales(&self, criteria: &FilterCriteria) -> GenreTotals {
        aggregate::genre_totals(&self.apply(criteria))
    }

    pub fn publisher_sales(&self, criteria: &FilterCriteria) -> LabeledValues {
        aggregate::publisher_totals(&self.apply(criteria), self.config.publisher_top_n)
    }

    /// Extract criteria from text and summarise the matching rows
    pub fn nl_filter(&self, text: &str) -> NlFilterSummary {
        let filters = self.extract(text);
        let kpi = self.kpi(&filters);

        NlFilterSummary {
            query: text.to_string(),
            filters,
            total_games: kpi.total_games,
            total_sales: kpi.total_sales,
        }
    }

    /// Write the filtered rows as CSV; returns the row count
    pub fn report_csv<W: Write>(&self, criteria: &FilterCriteria, writer: W) -> Result<usize> {
        let view = self.apply(criteria);
        let rows = export::write_view_csv(&view, writer)?;
        info!(rows, "Exported CSV report");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Region, SalesRecord};

    fn engine() -> SalesEngine {
        let table = DatasetTable::from_records(vec![
            SalesRecord::new("A").with_year(2005).with_genre("Action").with_platform("PS2")
                .with_publisher("X").with_sales(1.0, 0.5, 0.0, 0.0, 1.5),
            SalesRecord::new("B").with_year(2010).with_genre("Sports").with_platform("Wii")
                .with_publisher("Y").with_sales(0.0, 0.0, 2.0, 0.0, 2.0),
        ]);
        SalesEngine::new(Arc::new(table), Config::default()).unwrap()
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SalesEngine>();
    }

    #[test]
    fn repeated_queries_hit_the_cache_with_same_rows() {
        let engine = engine();
        let criteria = FilterCriteria::new().with_region(Region::JP);

        let first = engine.apply(&criteria).row_ids().to_vec();
        let second = engine.apply(&criteria).row_ids().to_vec();

        assert_eq!(first, second);
        let stats = engine.cache_stats();
        assert_eq!((stats.hit_count, stats.miss_count), (1, 1));
    }

    #[test]
    fn queries_never_narrow_the_shared_table() {
        let engine = engine();
        assert_eq!(engine.apply(&FilterCriteria::new().with_year(2005)).len(), 1);
        assert_eq!(engine.table().len(), 2);
        assert_eq!(engine.apply(&FilterCriteria::new()).len(), 2);
    }

    #[test]
    fn nl_filter_summarises_extracted_criteria() {
        let summary = engine().nl_filter("japan 2010 sports");
        assert_eq!(summary.filters.regions.to_vec(), vec![Region::JP]);
        assert_eq!(summary.total_games, 1);
        assert_eq!(summary.total_sales, 2.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["query"], "japan 2010 sports");
        assert_eq!(json["filters"]["genre"], serde_json::json!(["Sports"]));
    }

    #[test]
    fn concurrent_queries_agree() {
        let engine = engine();
        let criteria = FilterCriteria::new().with_genre("action");
        let expected = engine.kpi(&criteria);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| engine.kpi(&criteria))).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
