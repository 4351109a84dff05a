use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Region, RowId, SalesRecord};

/// Immutable, in-memory sales table. Loaded once and shared behind an `Arc`;
/// query paths only ever read it.
#[derive(Debug, Clone, Default)]
pub struct DatasetTable {
    records: Vec<SalesRecord>,
}

/// Row shape as it appears in the source CSV
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Rank", default)]
    rank: Option<String>,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Platform", default)]
    platform: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Genre", default)]
    genre: Option<String>,
    #[serde(rename = "Publisher", default)]
    publisher: Option<String>,
    #[serde(rename = "NA_Sales", default)]
    na_sales: Option<String>,
    #[serde(rename = "EU_Sales", default)]
    eu_sales: Option<String>,
    #[serde(rename = "JP_Sales", default)]
    jp_sales: Option<String>,
    #[serde(rename = "Other_Sales", default)]
    other_sales: Option<String>,
    #[serde(rename = "Global_Sales", default)]
    global_sales: Option<String>,
}

/// Distinct facet values offered to clients for building filters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOptions {
    pub years: Vec<i32>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub publishers: Vec<String>,
    pub regions: Vec<Region>,
}

impl DatasetTable {
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        DatasetTable { records }
    }

    /// Load the table from a CSV file with a header row
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            let kind = if e.kind() == std::io::ErrorKind::NotFound {
                ErrorKind::NotFound
            } else {
                ErrorKind::Io
            };
            Error::new(kind, format!("{}: {}", path.display(), e))
        })?;

        let table = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), rows = table.len(), "Loaded sales dataset");
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (index, row) in csv_reader.deserialize::<RawRow>().enumerate() {
            let line = index + 1;
            let raw = row?;
            match Self::convert_row(raw, line)? {
                Some(record) => records.push(record),
                None => {
                    skipped += 1;
                    debug!(row = line, "Skipping record without a name");
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "Dropped records with an empty Name");
        }

        Ok(DatasetTable { records })
    }

    fn convert_row(raw: RawRow, line: usize) -> Result<Option<SalesRecord>> {
        let name = match present(raw.name) {
            Some(name) => name,
            None => return Ok(None),
        };

        Ok(Some(SalesRecord {
            rank: present(raw.rank).and_then(|r| parse_integral(&r)).and_then(|r| u64::try_from(r).ok()),
            name,
            platform: present(raw.platform).unwrap_or_default(),
            year: present(raw.year).and_then(|y| parse_integral(&y)).and_then(|y| i32::try_from(y).ok()),
            genre: present(raw.genre).unwrap_or_default(),
            publisher: present(raw.publisher).unwrap_or_default(),
            na_sales: parse_sales(raw.na_sales, "NA_Sales", line)?,
            eu_sales: parse_sales(raw.eu_sales, "EU_Sales", line)?,
            jp_sales: parse_sales(raw.jp_sales, "JP_Sales", line)?,
            other_sales: parse_sales(raw.other_sales, "Other_Sales", line)?,
            global_sales: parse_sales(raw.global_sales, "Global_Sales", line)?,
        }))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, row: RowId) -> Option<&SalesRecord> {
        self.records.get(row.value())
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowId, &SalesRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (RowId(i), r))
    }

    pub fn options(&self) -> DatasetOptions {
        let years: BTreeSet<i32> = self.records.iter().filter_map(|r| r.year).collect();

        DatasetOptions {
            years: years.into_iter().collect(),
            genres: sorted_distinct(self.records.iter().map(|r| r.genre.as_str())),
            platforms: sorted_distinct(self.records.iter().map(|r| r.platform.as_str())),
            publishers: sorted_distinct(self.records.iter().map(|r| r.publisher.as_str())),
            regions: Region::ALL.to_vec(),
        }
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

const MISSING_MARKERS: [&str; 5] = ["", "n/a", "na", "nan", "null"];

pub(crate) fn is_missing(value: &str) -> bool {
    let value = value.trim();
    MISSING_MARKERS.iter().any(|m| value.eq_ignore_ascii_case(m))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_missing(v)).map(|v| v.trim().to_string())
}

/// Accepts "2005" as well as "2005.0"
pub(crate) fn parse_integral(value: &str) -> Option<i64> {
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

fn parse_sales(value: Option<String>, column: &str, line: usize) -> Result<f64> {
    let value = match present(value) {
        Some(v) => v,
        None => return Ok(0.0),
    };

    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(Error::new(
            ErrorKind::Parse,
            format!("row {}: invalid {} value '{}'", line, column, value),
        )),
    }
}
