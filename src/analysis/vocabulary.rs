use std::collections::HashSet;
use crate::analysis::tokenizer::{fold, StandardTokenizer};
use crate::core::dataset::DatasetTable;

/// A known facet value, pre-folded for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub original: String,
    pub folded: String,
    pub words: Vec<String>,
}

impl Term {
    pub fn new(original: &str, tokenizer: &StandardTokenizer) -> Self {
        Term {
            original: original.to_string(),
            folded: fold(original),
            words: tokenizer.words(original),
        }
    }
}

/// Distinct genre, platform and publisher values the extractor recognises
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    pub genres: Vec<Term>,
    pub platforms: Vec<Term>,
    pub publishers: Vec<Term>,
}

impl Vocabulary {
    pub fn new<S: AsRef<str>>(genres: &[S], platforms: &[S], publishers: &[S]) -> Self {
        let tokenizer = StandardTokenizer::default();
        Vocabulary {
            genres: build_terms(genres.iter().map(|s| s.as_ref()), &tokenizer),
            platforms: build_terms(platforms.iter().map(|s| s.as_ref()), &tokenizer),
            publishers: build_terms(publishers.iter().map(|s| s.as_ref()), &tokenizer),
        }
    }

    /// Distinct non-empty values in order of first appearance in the table
    pub fn from_table(table: &DatasetTable) -> Self {
        let tokenizer = StandardTokenizer::default();
        let records = table.records();
        Vocabulary {
            genres: build_terms(records.iter().map(|r| r.genre.as_str()), &tokenizer),
            platforms: build_terms(records.iter().map(|r| r.platform.as_str()), &tokenizer),
            publishers: build_terms(records.iter().map(|r| r.publisher.as_str()), &tokenizer),
        }
    }

    pub fn len(&self) -> usize {
        self.genres.len() + self.platforms.len() + self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_terms<'a>(values: impl Iterator<Item = &'a str>, tokenizer: &StandardTokenizer) -> Vec<Term> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(|v| Term::new(v, tokenizer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SalesRecord;

    #[test]
    fn from_table_keeps_first_seen_order_and_skips_empty() {
        let table = DatasetTable::from_records(vec![
            SalesRecord::new("A").with_genre("Sports").with_platform("Wii"),
            SalesRecord::new("B").with_genre("Action").with_platform("Wii"),
            SalesRecord::new("C").with_genre("Sports"),
        ]);
        let vocab = Vocabulary::from_table(&table);

        let genres: Vec<&str> = vocab.genres.iter().map(|t| t.original.as_str()).collect();
        assert_eq!(genres, vec!["Sports", "Action"]);
        assert_eq!(vocab.platforms.len(), 1);
        assert!(vocab.publishers.is_empty());
    }

    #[test]
    fn terms_are_folded_and_tokenized() {
        let vocab = Vocabulary::new(&[] as &[&str], &[] as &[&str], &["Electronic Arts"]);
        let term = &vocab.publishers[0];
        assert_eq!(term.folded, "electronic arts");
        assert_eq!(term.words, vec!["electronic", "arts"]);
    }
}
