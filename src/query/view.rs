use std::sync::Arc;
use crate::core::dataset::DatasetTable;
use crate::core::types::{RowId, SalesRecord};
use crate::query::criteria::FilterCriteria;
use crate::query::matcher::RecordMatcher;

/// Rows of a `DatasetTable` that passed a filter, in table order.
/// Borrows the table; never copies or mutates it.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a DatasetTable,
    rows: Arc<[RowId]>,
}

impl<'a> FilteredView<'a> {
    pub(crate) fn new(table: &'a DatasetTable, rows: Arc<[RowId]>) -> Self {
        FilteredView { table, rows }
    }

    /// The whole table
    pub fn full(table: &'a DatasetTable) -> Self {
        let rows: Arc<[RowId]> = (0..table.len()).map(RowId).collect();
        FilteredView { table, rows }
    }

    pub fn table(&self) -> &'a DatasetTable {
        self.table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_ids(&self) -> &[RowId] {
        &self.rows
    }

    pub(crate) fn shared_rows(&self) -> Arc<[RowId]> {
        self.rows.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowId, &'a SalesRecord)> + '_ {
        let table = self.table;
        self.rows
            .iter()
            .filter_map(move |row| table.get(*row).map(|record| (*row, record)))
    }

    pub fn records(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.iter().map(|(_, record)| record)
    }

    /// Narrow this view further
    pub fn filter(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        if criteria.is_empty() {
            return self.clone();
        }

        let matcher = RecordMatcher::new(criteria);
        let rows: Arc<[RowId]> = self
            .iter()
            .filter(|(_, record)| matcher.matches(record))
            .map(|(row, _)| row)
            .collect();
        FilteredView { table: self.table, rows }
    }

    /// Copy the surviving records into a standalone table
    pub fn to_table(&self) -> DatasetTable {
        DatasetTable::from_records(self.records().cloned().collect())
    }
}
