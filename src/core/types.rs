use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind};

/// Position of a record in the dataset table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(pub usize);

impl RowId {
    pub fn new(id: usize) -> Self {
        RowId(id)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl From<usize> for RowId {
    fn from(id: usize) -> Self {
        RowId(id)
    }
}

/// Sales market bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    NA,
    EU,
    JP,
    Other,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::NA, Region::EU, Region::JP, Region::Other];

    pub fn code(&self) -> &'static str {
        match self {
            Region::NA => "NA",
            Region::EU => "EU",
            Region::JP => "JP",
            Region::Other => "Other",
        }
    }

    /// Dataset column holding this region's sales
    pub fn column(&self) -> &'static str {
        match self {
            Region::NA => "NA_Sales",
            Region::EU => "EU_Sales",
            Region::JP => "JP_Sales",
            Region::Other => "Other_Sales",
        }
    }

    pub fn sales(&self, record: &SalesRecord) -> f64 {
        match self {
            Region::NA => record.na_sales,
            Region::EU => record.eu_sales,
            Region::JP => record.jp_sales,
            Region::Other => record.other_sales,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::new(ErrorKind::InvalidArgument, format!("unknown region '{}'", s)))
    }
}

/// One row of the sales dataset. Sales figures are millions of units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub rank: Option<u64>,
    pub name: String,
    pub platform: String,
    pub year: Option<i32>,
    pub genre: String,
    pub publisher: String,
    pub na_sales: f64,
    pub eu_sales: f64,
    pub jp_sales: f64,
    pub other_sales: f64,
    /// Trusted as given, not recomputed from the regional columns
    pub global_sales: f64,
}

impl SalesRecord {
    pub fn new(name: impl Into<String>) -> Self {
        SalesRecord {
            rank: None,
            name: name.into(),
            platform: String::new(),
            year: None,
            genre: String::new(),
            publisher: String::new(),
            na_sales: 0.0,
            eu_sales: 0.0,
            jp_sales: 0.0,
            other_sales: 0.0,
            global_sales: 0.0,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    /// Sets the four regional columns and Global_Sales in one go
    pub fn with_sales(mut self, na: f64, eu: f64, jp: f64, other: f64, global: f64) -> Self {
        self.na_sales = na;
        self.eu_sales = eu;
        self.jp_sales = jp;
        self.other_sales = other;
        self.global_sales = global;
        self
    }
}
