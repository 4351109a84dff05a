use std::collections::HashSet;
use crate::analysis::tokenizer::fold;
use crate::core::types::{Region, SalesRecord};
use crate::query::criteria::FilterCriteria;

/// Compiled record predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    MatchAll,
    MatchNone,
    All(Vec<Predicate>),           // AND
    Any(Vec<Predicate>),           // OR
    YearIn(HashSet<i32>),
    GenreIn(HashSet<String>),      // Folded values
    PlatformIn(HashSet<String>),
    PublisherIn(HashSet<String>),
    RegionSold(Region),            // Region column > 0
    NameContains(String),          // Folded needle
}

impl Predicate {
    /// One clause per active facet. The region facet becomes an OR over
    /// per-region clauses, folded up from "no rows".
    pub fn compile(criteria: &FilterCriteria) -> Self {
        let mut clauses = Vec::new();

        if !criteria.years.is_empty() {
            clauses.push(Predicate::YearIn(criteria.years.iter().copied().collect()));
        }
        if !criteria.genres.is_empty() {
            clauses.push(Predicate::GenreIn(fold_all(criteria.genres.iter())));
        }
        if !criteria.platforms.is_empty() {
            clauses.push(Predicate::PlatformIn(fold_all(criteria.platforms.iter())));
        }
        if !criteria.publishers.is_empty() {
            clauses.push(Predicate::PublisherIn(fold_all(criteria.publishers.iter())));
        }
        if !criteria.regions.is_empty() {
            let regions = criteria
                .regions
                .iter()
                .fold(Predicate::MatchNone, |acc, region| acc.or(Predicate::RegionSold(*region)));
            clauses.push(regions);
        }
        if let Some(name) = &criteria.name {
            clauses.push(Predicate::NameContains(fold(name)));
        }

        match clauses.len() {
            0 => Predicate::MatchAll,
            1 => clauses.remove(0),
            _ => Predicate::All(clauses),
        }
    }

    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::MatchNone, p) | (p, Predicate::MatchNone) => p,
            (Predicate::Any(mut left), Predicate::Any(right)) => {
                left.extend(right);
                Predicate::Any(left)
            }
            (Predicate::Any(mut left), p) => {
                left.push(p);
                Predicate::Any(left)
            }
            (p, Predicate::Any(mut right)) => {
                right.insert(0, p);
                Predicate::Any(right)
            }
            (left, right) => Predicate::Any(vec![left, right]),
        }
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        match self {
            Predicate::MatchAll => true,
            Predicate::MatchNone => false,
            Predicate::All(clauses) => clauses.iter().all(|p| p.matches(record)),
            Predicate::Any(clauses) => clauses.iter().any(|p| p.matches(record)),

            // Null years never match a year list
            Predicate::YearIn(years) => record.year.is_some_and(|y| years.contains(&y)),

            Predicate::GenreIn(values) => folded_member(&record.genre, values),
            Predicate::PlatformIn(values) => folded_member(&record.platform, values),
            Predicate::PublisherIn(values) => folded_member(&record.publisher, values),

            Predicate::RegionSold(region) => region.sales(record) > 0.0,

            Predicate::NameContains(needle) => {
                !record.name.is_empty() && fold(&record.name).contains(needle.as_str())
            }
        }
    }
}

fn fold_all<'a>(values: impl Iterator<Item = &'a String>) -> HashSet<String> {
    values.map(|v| fold(v)).collect()
}

/// Empty values (missing in the source) never match
fn folded_member(value: &str, values: &HashSet<String>) -> bool {
    !value.is_empty() && values.contains(&fold(value))
}

/// Record matcher for one set of criteria
#[derive(Debug, Clone)]
pub struct RecordMatcher {
    predicate: Predicate,
}

impl RecordMatcher {
    pub fn new(criteria: &FilterCriteria) -> Self {
        RecordMatcher {
            predicate: Predicate::compile(criteria),
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.predicate.matches(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_a() -> SalesRecord {
        SalesRecord::new("Alpha Strike")
            .with_year(2005)
            .with_genre("Action")
            .with_platform("PS2")
            .with_publisher("X")
            .with_sales(1.0, 0.5, 0.0, 0.0, 1.5)
    }

    #[test]
    fn empty_criteria_compiles_to_match_all() {
        assert_eq!(Predicate::compile(&FilterCriteria::new()), Predicate::MatchAll);
    }

    #[test]
    fn region_facet_is_an_or_of_region_clauses() {
        let criteria = FilterCriteria::new().with_region(Region::NA).with_region(Region::JP);
        assert_eq!(
            Predicate::compile(&criteria),
            Predicate::Any(vec![Predicate::RegionSold(Region::NA), Predicate::RegionSold(Region::JP)])
        );

        let single = FilterCriteria::new().with_region(Region::JP);
        assert_eq!(Predicate::compile(&single), Predicate::RegionSold(Region::JP));
        assert!(!RecordMatcher::new(&single).matches(&game_a()));
        assert!(RecordMatcher::new(&criteria).matches(&game_a()));
    }

    #[test]
    fn string_facets_are_case_insensitive() {
        let criteria = FilterCriteria::new().with_genre("action").with_platform("ps2").with_publisher("x");
        assert!(RecordMatcher::new(&criteria).matches(&game_a()));
    }

    #[test]
    fn facets_combine_with_and() {
        let criteria = FilterCriteria::new().with_year(2005).with_genre("Sports");
        assert!(!RecordMatcher::new(&criteria).matches(&game_a()));
    }

    #[test]
    fn null_year_never_matches_year_facet() {
        let mut record = game_a();
        record.year = None;
        assert!(!RecordMatcher::new(&FilterCriteria::new().with_year(2005)).matches(&record));
    }

    #[test]
    fn missing_genre_never_matches() {
        let record = SalesRecord::new("Blank");
        let criteria = FilterCriteria {
            genres: [String::new()].into_iter().collect(),
            ..FilterCriteria::default()
        };
        assert!(!RecordMatcher::new(&criteria).matches(&record));
    }

    #[test]
    fn name_is_a_case_insensitive_substring() {
        assert!(RecordMatcher::new(&FilterCriteria::new().with_name("STRIKE")).matches(&game_a()));
        assert!(!RecordMatcher::new(&FilterCriteria::new().with_name("strikes")).matches(&game_a()));
    }

    #[test]
    fn whitespace_name_matches_multi_word_titles() {
        let space = RecordMatcher::new(&FilterCriteria::new().with_name(" "));
        assert!(space.matches(&game_a()));
        assert!(!space.matches(&SalesRecord::new("Tetris")));
    }
}
