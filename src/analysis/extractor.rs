use std::sync::{Arc, LazyLock};
use regex::Regex;
use tracing::debug;
use crate::analysis::regions::REGION_ALIASES;
use crate::analysis::tokenizer::{contains_words, fold, StandardTokenizer};
use crate::analysis::vocabulary::{Term, Vocabulary};
use crate::query::criteria::FilterCriteria;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(19\d{2}|20\d{2})").expect("year pattern is valid"));

/// How vocabulary values are located in free text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Plain substring containment on the folded text. Short values can
    /// hit inside unrelated words ("na" in "name").
    #[default]
    Substring,
    /// Whole-word runs only, using Unicode word segmentation
    Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub match_mode: MatchMode,
    /// Phrases that mark the text as a search by game name
    pub name_triggers: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            match_mode: MatchMode::Substring,
            name_triggers: vec!["tên là".to_string(), "game tên".to_string()],
        }
    }
}

/// Turns free text into `FilterCriteria` by scanning for known vocabulary.
/// Extraction never fails: text with no recognisable terms yields empty criteria.
#[derive(Debug, Clone)]
pub struct NlExtractor {
    vocabulary: Arc<Vocabulary>,
    config: ExtractorConfig,
    tokenizer: StandardTokenizer,
}

/// Folded input prepared for one match mode
struct Haystack {
    folded: String,
    words: Vec<String>,
}

impl NlExtractor {
    pub fn new(vocabulary: Arc<Vocabulary>, config: ExtractorConfig) -> Self {
        NlExtractor {
            vocabulary,
            config,
            tokenizer: StandardTokenizer::default(),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn extract(&self, text: &str) -> FilterCriteria {
        let haystack = Haystack {
            folded: fold(text),
            words: match self.config.match_mode {
                MatchMode::Substring => Vec::new(),
                MatchMode::Token => self.tokenizer.words(text),
            },
        };

        let mut criteria = FilterCriteria::default();

        for (alias, region) in REGION_ALIASES {
            if self.contains_phrase(&haystack, alias) {
                criteria.regions.insert(*region);
            }
        }

        for year in self.years(&haystack) {
            criteria.years.insert(year);
        }

        for term in self.matching_terms(&haystack, &self.vocabulary.genres) {
            criteria.genres.insert(term.original.clone());
        }
        for term in self.matching_terms(&haystack, &self.vocabulary.platforms) {
            criteria.platforms.insert(term.original.clone());
        }
        for term in self.matching_terms(&haystack, &self.vocabulary.publishers) {
            criteria.publishers.insert(term.original.clone());
        }

        // The whole query stands in for the game name; no name token is isolated
        let names_a_game = self
            .config
            .name_triggers
            .iter()
            .any(|trigger| self.contains_phrase(&haystack, &fold(trigger)));
        criteria.name = if names_a_game {
            Some(haystack.folded.clone())
        } else {
            None
        };

        debug!(
            mode = ?self.config.match_mode,
            active_facets = criteria.active_facets(),
            "Extracted filter criteria from text"
        );

        criteria
    }

    fn years(&self, haystack: &Haystack) -> Vec<i32> {
        match self.config.match_mode {
            MatchMode::Substring => YEAR_PATTERN
                .find_iter(&haystack.folded)
                .filter_map(|m| m.as_str().parse().ok())
                .collect(),
            MatchMode::Token => haystack
                .words
                .iter()
                .filter(|w| YEAR_PATTERN.find(w).is_some_and(|m| m.len() == w.len()))
                .filter_map(|w| w.parse().ok())
                .collect(),
        }
    }

    fn matching_terms<'a>(&self, haystack: &Haystack, terms: &'a [Term]) -> Vec<&'a Term> {
        terms
            .iter()
            .filter(|term| match self.config.match_mode {
                MatchMode::Substring => haystack.folded.contains(&term.folded),
                MatchMode::Token => contains_words(&haystack.words, &term.words),
            })
            .collect()
    }

    fn contains_phrase(&self, haystack: &Haystack, phrase: &str) -> bool {
        match self.config.match_mode {
            MatchMode::Substring => haystack.folded.contains(phrase),
            MatchMode::Token => contains_words(&haystack.words, &self.tokenizer.words(phrase)),
        }
    }
}

/// One-shot extraction with the default substring matching
pub fn extract(text: &str, vocabulary: &Vocabulary) -> FilterCriteria {
    NlExtractor::new(Arc::new(vocabulary.clone()), ExtractorConfig::default()).extract(text)
}
