use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Metric label reported by an empty top-games result
pub const NO_DATA: &str = "No data";

/// Best sellers by name, highest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopGames {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub metric: String,
}

impl TopGames {
    pub fn no_data() -> Self {
        TopGames {
            labels: Vec::new(),
            values: Vec::new(),
            metric: NO_DATA.to_string(),
        }
    }

    /// The filtered view was empty (as opposed to games selling nothing)
    pub fn is_no_data(&self) -> bool {
        self.metric == NO_DATA && self.labels.is_empty()
    }
}

/// Parallel label/value sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabeledValues {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl LabeledValues {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, f64)>) -> Self {
        let (labels, values) = pairs.into_iter().unzip();
        LabeledValues { labels, values }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.iter().find(|(l, _)| *l == label).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Headline numbers for a filtered view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    /// Global_Sales sum, rounded to 2 decimals
    pub total_sales: f64,
    /// Distinct game names
    pub total_games: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
}

/// Sales per year, one series per selected column, aligned to `labels`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearlySeries {
    pub labels: Vec<i32>,
    pub datasets: Vec<Series>,
}

impl YearlySeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// No years and no series, as opposed to series of zeros
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.datasets.is_empty()
    }

    pub fn series(&self, label: &str) -> Option<&Series> {
        self.datasets.iter().find(|s| s.label == label)
    }
}

/// Global sales per genre, highest first. Serializes as a JSON object
/// whose key order follows the ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreTotals {
    pub entries: Vec<(String, f64)>,
}

impl GenreTotals {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, genre: &str) -> Option<f64> {
        self.entries.iter().find(|(g, _)| g == genre).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(g, v)| (g.as_str(), *v))
    }
}

impl Serialize for GenreTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (genre, total) in &self.entries {
            map.serialize_entry(genre, total)?;
        }
        map.end()
    }
}
