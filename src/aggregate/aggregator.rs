use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use crate::aggregate::results::{GenreTotals, Kpi, LabeledValues, Series, TopGames, YearlySeries};
use crate::aggregate::selection::SalesSelection;
use crate::core::types::{Region, SalesRecord};
use crate::query::view::FilteredView;

/// Round for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sum values per key, keeping keys in first-encounter order
fn group_sum<'a>(pairs: impl Iterator<Item = (&'a str, f64)>) -> Vec<(String, f64)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, f64)> = Vec::new();

    for (key, value) in pairs {
        match index.get(key) {
            Some(&i) => groups[i].1 += value,
            None => {
                index.insert(key, groups.len());
                groups.push((key, value));
            }
        }
    }

    groups.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Highest first; the sort is stable so ties keep encounter order
fn rank_descending(groups: &mut [(String, f64)]) {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Best sellers by name under the selected sales figure
pub fn top_games(view: &FilteredView<'_>, selection: &SalesSelection, n: usize) -> TopGames {
    if view.is_empty() {
        return TopGames::no_data();
    }

    let mut groups = group_sum(view.records().map(|r| (r.name.as_str(), selection.value(r))));
    rank_descending(&mut groups);
    groups.truncate(n);

    let (labels, values) = groups.into_iter().unzip();
    TopGames {
        labels,
        values,
        metric: selection.metric_label(),
    }
}

/// Per-region sums. With `regions` empty all four are reported, otherwise
/// only the requested ones in request order.
pub fn region_totals(view: &FilteredView<'_>, regions: &[Region]) -> LabeledValues {
    let mut requested: Vec<Region> = Vec::new();
    for region in regions {
        if !requested.contains(region) {
            requested.push(*region);
        }
    }
    if requested.is_empty() {
        requested = Region::ALL.to_vec();
    }

    LabeledValues::from_pairs(requested.into_iter().map(|region| {
        let total: f64 = view.records().map(|r| region.sales(r)).sum();
        (region.code().to_string(), total)
    }))
}

pub fn kpi(view: &FilteredView<'_>) -> Kpi {
    let names: HashSet<&str> = view.records().map(|r| r.name.as_str()).collect();
    let total: f64 = view.records().map(|r| r.global_sales).sum();

    Kpi {
        total_sales: round2(total),
        total_games: names.len(),
    }
}

/// Selected columns summed per year. Records without a year are left out.
pub fn yearly_series(view: &FilteredView<'_>, selection: &SalesSelection) -> YearlySeries {
    let columns = selection.columns();
    if view.is_empty() || columns.is_empty() {
        return YearlySeries::empty();
    }

    let dated: Vec<(i32, &SalesRecord)> = view
        .records()
        .filter_map(|r| r.year.map(|y| (y, r)))
        .collect();

    let years: Vec<i32> = dated
        .iter()
        .map(|(y, _)| *y)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let datasets = columns
        .iter()
        .map(|column| {
            let mut per_year: BTreeMap<i32, f64> = BTreeMap::new();
            for (year, record) in &dated {
                *per_year.entry(*year).or_insert(0.0) += column.value(record);
            }
            Series {
                label: column.label().to_string(),
                data: years.iter().map(|y| per_year.get(y).copied().unwrap_or(0.0)).collect(),
            }
        })
        .collect();

    YearlySeries {
        labels: years,
        datasets,
    }
}

/// Global sales per genre, every genre, highest first
pub fn genre_totals(view: &FilteredView<'_>) -> GenreTotals {
    let mut entries = group_sum(
        view.records()
            .filter(|r| !r.genre.is_empty())
            .map(|r| (r.genre.as_str(), r.global_sales)),
    );
    rank_descending(&mut entries);
    GenreTotals { entries }
}

/// Global sales per publisher, top `n`, highest first
pub fn publisher_totals(view: &FilteredView<'_>, n: usize) -> LabeledValues {
    let mut groups = group_sum(
        view.records()
            .filter(|r| !r.publisher.is_empty())
            .map(|r| (r.publisher.as_str(), r.global_sales)),
    );
    rank_descending(&mut groups);
    groups.truncate(n);
    LabeledValues::from_pairs(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::DatasetTable;
    use crate::query::criteria::FilterCriteria;
    use crate::query::filter::apply;

    fn table() -> DatasetTable {
        DatasetTable::from_records(vec![
            SalesRecord::new("A").with_year(2005).with_genre("Action").with_publisher("X")
                .with_sales(1.0, 0.5, 0.0, 0.0, 1.5),
            SalesRecord::new("B").with_year(2010).with_genre("Sports").with_publisher("Y")
                .with_sales(0.0, 0.0, 2.0, 0.0, 2.0),
            SalesRecord::new("C").with_genre("Action").with_publisher("X")
                .with_sales(0.25, 0.25, 0.0, 0.0, 0.5),
            SalesRecord::new("A").with_year(2010).with_genre("Action").with_publisher("Z")
                .with_sales(0.5, 0.0, 0.0, 0.0, 0.5),
        ])
    }

    #[test]
    fn top_games_groups_by_name() {
        let table = table();
        let view = FilteredView::full(&table);
        let top = top_games(&view, &SalesSelection::global(), 10);
        assert_eq!(top.labels, vec!["A", "B", "C"]);
        assert_eq!(top.values, vec![2.0, 2.0, 0.5]);
        assert_eq!(top.metric, "Global_Sales");
    }

    #[test]
    fn top_games_ties_keep_encounter_order_and_truncate() {
        let table = DatasetTable::from_records(
            (0..15).map(|i| SalesRecord::new(format!("G{}", i)).with_sales(0.0, 0.0, 0.0, 0.0, 1.0)).collect(),
        );
        let top = top_games(&FilteredView::full(&table), &SalesSelection::global(), 10);
        let expected: Vec<String> = (0..10).map(|i| format!("G{}", i)).collect();
        assert_eq!(top.labels, expected);
    }

    #[test]
    fn top_games_on_empty_view_is_no_data() {
        let table = table();
        let view = apply(&table, &FilterCriteria::new().with_year(1980));
        assert!(top_games(&view, &SalesSelection::global(), 10).is_no_data());
    }

    #[test]
    fn top_games_zero_sales_is_not_no_data() {
        let table = DatasetTable::from_records(vec![SalesRecord::new("Flop")]);
        let top = top_games(&FilteredView::full(&table), &SalesSelection::global(), 10);
        assert!(!top.is_no_data());
        assert_eq!(top.values, vec![0.0]);
    }

    #[test]
    fn region_totals_all_or_requested() {
        let table = table();
        let view = FilteredView::full(&table);

        let all = region_totals(&view, &[]);
        assert_eq!(all.labels, vec!["NA", "EU", "JP", "Other"]);
        assert_eq!(all.values, vec![1.75, 0.75, 2.0, 0.0]);

        let jp = region_totals(&view, &[Region::JP]);
        assert_eq!(jp.labels, vec!["JP"]);
        assert_eq!(jp.get("JP"), Some(2.0));
    }

    #[test]
    fn kpi_counts_distinct_names() {
        let table = table();
        let kpi = kpi(&FilteredView::full(&table));
        assert_eq!(kpi.total_games, 3);
        assert_eq!(kpi.total_sales, 4.5);
    }

    #[test]
    fn kpi_rounds_to_two_decimals() {
        let table = DatasetTable::from_records(vec![
            SalesRecord::new("A").with_sales(0.0, 0.0, 0.0, 0.0, 0.111),
            SalesRecord::new("B").with_sales(0.0, 0.0, 0.0, 0.0, 0.222),
        ]);
        assert_eq!(kpi(&FilteredView::full(&table)).total_sales, 0.33);
    }

    #[test]
    fn yearly_series_aligns_years_and_skips_undated() {
        let table = table();
        let view = FilteredView::full(&table);

        let series = yearly_series(&view, &SalesSelection::regions(&[Region::NA, Region::JP]));
        assert_eq!(series.labels, vec![2005, 2010]);
        assert_eq!(series.series("NA").unwrap().data, vec![1.0, 0.5]);
        assert_eq!(series.series("JP").unwrap().data, vec![0.0, 2.0]);

        let global = yearly_series(&view, &SalesSelection::global());
        assert_eq!(global.datasets.len(), 1);
        assert_eq!(global.datasets[0].label, "Global");
        assert_eq!(global.datasets[0].data, vec![1.5, 2.5]);
    }

    #[test]
    fn yearly_series_on_empty_view_is_empty() {
        let table = table();
        let view = apply(&table, &FilterCriteria::new().with_genre("Puzzle"));
        assert!(yearly_series(&view, &SalesSelection::global()).is_empty());
    }

    #[test]
    fn genre_and_publisher_totals_rank_descending() {
        let table = table();
        let view = FilteredView::full(&table);

        let genres = genre_totals(&view);
        assert_eq!(genres.entries, vec![("Action".to_string(), 2.5), ("Sports".to_string(), 2.0)]);

        let publishers = publisher_totals(&view, 2);
        assert_eq!(publishers.labels, vec!["X", "Y"]);
        assert_eq!(publishers.values, vec![2.0, 2.0]);
    }

    #[test]
    fn publisher_totals_skip_missing_publishers() {
        let table = DatasetTable::from_records(vec![
            SalesRecord::new("A").with_sales(0.0, 0.0, 0.0, 0.0, 5.0),
            SalesRecord::new("B").with_publisher("Y").with_sales(0.0, 0.0, 0.0, 0.0, 1.0),
        ]);
        let publishers = publisher_totals(&FilteredView::full(&table), 10);
        assert_eq!(publishers.labels, vec!["Y"]);
    }
}
