use std::sync::Arc;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::debug;
use crate::core::config::Config;
use crate::core::dataset::DatasetTable;
use crate::core::error::Result;
use crate::core::types::RowId;
use crate::query::criteria::FilterCriteria;
use crate::query::matcher::RecordMatcher;
use crate::query::view::FilteredView;

/// Keep the rows of `table` that satisfy `criteria`, in table order
pub fn apply<'a>(table: &'a DatasetTable, criteria: &FilterCriteria) -> FilteredView<'a> {
    if criteria.is_empty() {
        return FilteredView::full(table);
    }
    let matcher = RecordMatcher::new(criteria);
    FilteredView::new(table, select_sequential(table, &matcher).into())
}

fn select_sequential(table: &DatasetTable, matcher: &RecordMatcher) -> Vec<RowId> {
    table
        .iter()
        .filter(|(_, record)| matcher.matches(record))
        .map(|(row, _)| row)
        .collect()
}

/// Filter application that moves large tables onto a worker pool
#[derive(Debug)]
pub struct FilterEngine {
    pool: ThreadPool,
    parallel_threshold: usize,
}

impl FilterEngine {
    pub fn new(config: &Config) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads.max(1))
            .thread_name(|i| format!("vgsales-filter-{}", i))
            .build()?;

        Ok(FilterEngine {
            pool,
            parallel_threshold: config.parallel_threshold,
        })
    }

    pub fn apply<'a>(&self, table: &'a DatasetTable, criteria: &FilterCriteria) -> FilteredView<'a> {
        if criteria.is_empty() {
            return FilteredView::full(table);
        }
        let rows: Arc<[RowId]> = self.select_rows(table, criteria).into();
        FilteredView::new(table, rows)
    }

    pub fn select_rows(&self, table: &DatasetTable, criteria: &FilterCriteria) -> Vec<RowId> {
        let matcher = RecordMatcher::new(criteria);

        if table.len() < self.parallel_threshold {
            return select_sequential(table, &matcher);
        }

        debug!(rows = table.len(), threads = self.pool.current_num_threads(), "Filtering on worker pool");

        // Indexed collect keeps table order
        self.pool.install(|| {
            table
                .records()
                .par_iter()
                .enumerate()
                .filter(|(_, record)| matcher.matches(record))
                .map(|(i, _)| RowId(i))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Region, SalesRecord};

    fn table() -> DatasetTable {
        DatasetTable::from_records(
            (0..200)
                .map(|i| {
                    SalesRecord::new(format!("Game {}", i))
                        .with_year(2000 + (i % 5) as i32)
                        .with_genre(if i % 2 == 0 { "Action" } else { "Sports" })
                        .with_sales(0.0, (i % 3) as f64, 0.0, 0.0, 1.0)
                })
                .collect(),
        )
    }

    #[test]
    fn parallel_and_sequential_paths_agree() {
        let table = table();
        let criteria = FilterCriteria::new().with_genre("action").with_region(Region::EU);

        let sequential = apply(&table, &criteria);

        let config = Config {
            parallel_threshold: 0,
            worker_threads: 4,
            ..Config::default()
        };
        let engine = FilterEngine::new(&config).unwrap();
        let parallel = engine.apply(&table, &criteria);

        assert!(!sequential.is_empty());
        assert_eq!(sequential.row_ids(), parallel.row_ids());
        assert!(parallel.row_ids().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_criteria_keeps_every_row() {
        let table = table();
        let view = apply(&table, &FilterCriteria::new());
        assert_eq!(view.len(), table.len());
    }

    #[test]
    fn unknown_values_match_nothing() {
        let table = table();
        let view = apply(&table, &FilterCriteria::new().with_genre("Strategy"));
        assert!(view.is_empty());
    }
}
