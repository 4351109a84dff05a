use std::fmt;
use crate::core::types::{Region, SalesRecord};
use crate::query::criteria::FilterCriteria;

/// A sales column that aggregates can sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesColumn {
    Region(Region),
    Global,
}

impl SalesColumn {
    /// Dataset column name, e.g. "NA_Sales"
    pub fn name(&self) -> &'static str {
        match self {
            SalesColumn::Region(region) => region.column(),
            SalesColumn::Global => "Global_Sales",
        }
    }

    /// Short series label, e.g. "NA"
    pub fn label(&self) -> &'static str {
        match self {
            SalesColumn::Region(region) => region.code(),
            SalesColumn::Global => "Global",
        }
    }

    pub fn value(&self, record: &SalesRecord) -> f64 {
        match self {
            SalesColumn::Region(region) => region.sales(record),
            SalesColumn::Global => record.global_sales,
        }
    }
}

impl fmt::Display for SalesColumn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which sales figure a request is about: the sum of the selected regions,
/// or Global_Sales when no region was selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SalesSelection {
    regions: Vec<Region>,
}

impl SalesSelection {
    pub fn global() -> Self {
        SalesSelection::default()
    }

    pub fn regions(regions: &[Region]) -> Self {
        let mut selected = Vec::with_capacity(regions.len());
        for region in regions {
            if !selected.contains(region) {
                selected.push(*region);
            }
        }
        SalesSelection { regions: selected }
    }

    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self::regions(criteria.regions.as_slice())
    }

    pub fn is_global(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn columns(&self) -> Vec<SalesColumn> {
        if self.is_global() {
            vec![SalesColumn::Global]
        } else {
            self.regions.iter().map(|r| SalesColumn::Region(*r)).collect()
        }
    }

    /// Selected sales for one record
    pub fn value(&self, record: &SalesRecord) -> f64 {
        if self.is_global() {
            record.global_sales
        } else {
            self.regions.iter().map(|r| r.sales(record)).sum()
        }
    }

    /// e.g. "NA_Sales+EU_Sales" or "Global_Sales"
    pub fn metric_label(&self) -> String {
        self.columns()
            .iter()
            .map(SalesColumn::name)
            .collect::<Vec<_>>()
            .join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_by_default() {
        let selection = SalesSelection::from_criteria(&FilterCriteria::new());
        let record = SalesRecord::new("A").with_sales(1.0, 2.0, 3.0, 4.0, 9.5);
        assert_eq!(selection.value(&record), 9.5);
        assert_eq!(selection.metric_label(), "Global_Sales");
        assert_eq!(selection.columns(), vec![SalesColumn::Global]);
    }

    #[test]
    fn sums_requested_regions_in_request_order() {
        let selection = SalesSelection::regions(&[Region::EU, Region::NA, Region::EU]);
        let record = SalesRecord::new("A").with_sales(1.0, 2.0, 3.0, 4.0, 9.5);
        assert_eq!(selection.value(&record), 3.0);
        assert_eq!(selection.metric_label(), "EU_Sales+NA_Sales");
        assert_eq!(SalesColumn::Region(Region::Other).label(), "Other");
    }
}
