use serde::{Serialize, Serializer};
use crate::analysis::tokenizer::fold;
use crate::core::types::Region;

/// Set of accepted values for one facet. Keeps insertion order for display,
/// but equality ignores order. An empty set places no restriction.
#[derive(Debug, Clone)]
pub struct FacetSet<T> {
    values: Vec<T>,
}

impl<T> Default for FacetSet<T> {
    fn default() -> Self {
        FacetSet { values: Vec::new() }
    }
}

impl<T: PartialEq> FacetSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the value was already present
    pub fn insert(&mut self, value: T) -> bool {
        if self.values.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T: PartialEq + Clone> FacetSet<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.values.clone()
    }
}

impl<T: PartialEq> PartialEq for FacetSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<T: PartialEq> FromIterator<T> for FacetSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = FacetSet::new();
        set.extend(iter);
        set
    }
}

impl<T: PartialEq> Extend<T> for FacetSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a FacetSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: Serialize> Serialize for FacetSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// What to keep from the dataset. Facets combine with AND, values within a
/// facet with OR. Serialized with the field names clients already use.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    #[serde(rename = "year")]
    pub years: FacetSet<i32>,
    #[serde(rename = "genre")]
    pub genres: FacetSet<String>,
    #[serde(rename = "platform")]
    pub platforms: FacetSet<String>,
    #[serde(rename = "publisher")]
    pub publishers: FacetSet<String>,
    #[serde(rename = "region")]
    pub regions: FacetSet<Region>,
    /// Case-insensitive substring of the game name
    pub name: Option<String>,
}

/// Order- and case-insensitive identity of a `FilterCriteria`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CriteriaKey {
    years: Vec<i32>,
    genres: Vec<String>,
    platforms: Vec<String>,
    publishers: Vec<String>,
    regions: Vec<Region>,
    name: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// No facet restricts anything
    pub fn is_empty(&self) -> bool {
        self.active_facets() == 0
    }

    pub fn active_facets(&self) -> usize {
        [
            !self.years.is_empty(),
            !self.genres.is_empty(),
            !self.platforms.is_empty(),
            !self.publishers.is_empty(),
            !self.regions.is_empty(),
            self.name.is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.years.insert(year);
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.insert(genre.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platforms.insert(platform.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publishers.insert(publisher.into());
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.regions.insert(region);
        self
    }

    /// An empty name is treated as absent; whitespace is kept as a needle
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
    }

    pub fn cache_key(&self) -> CriteriaKey {
        let mut years = self.years.to_vec();
        years.sort_unstable();

        let mut regions = self.regions.to_vec();
        regions.sort_unstable();

        CriteriaKey {
            years,
            genres: folded_sorted(&self.genres),
            platforms: folded_sorted(&self.platforms),
            publishers: folded_sorted(&self.publishers),
            regions,
            name: self.name.as_deref().map(fold),
        }
    }
}

fn folded_sorted(values: &FacetSet<String>) -> Vec<String> {
    let mut folded: Vec<String> = values.iter().map(|v| fold(v)).collect();
    folded.sort_unstable();
    folded.dedup();
    folded
}
