use unicode_segmentation::UnicodeSegmentation;
use crate::analysis::token::Token;

/// Case-fold text for vocabulary matching
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Unicode word tokenizer. Splits on UAX #29 word boundaries, so
/// "bắc mỹ" gives two tokens and "Take-Two" gives "take" and "two".
#[derive(Debug, Clone)]
pub struct StandardTokenizer {
    pub max_token_length: usize,
}

impl Default for StandardTokenizer {
    fn default() -> Self {
        StandardTokenizer {
            max_token_length: 255,
        }
    }
}

impl StandardTokenizer {
    /// Token texts only
    pub fn words(&self, text: &str) -> Vec<String> {
        self.tokenize(text).into_iter().map(|t| t.text).collect()
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let folded = fold(text);

        let mut tokens = Vec::new();
        let mut position = 0u32;

        for (offset, word) in folded.unicode_word_indices() {
            if word.len() <= self.max_token_length {
                tokens.push(Token::new(word.to_string(), position, offset));
                position += 1;
            }
        }

        tokens
    }
}

/// True when `needle` occurs as a contiguous run of whole words in `haystack`
pub fn contains_words<S: AsRef<str>, T: AsRef<str>>(haystack: &[S], needle: &[T]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }

    haystack.windows(needle.len()).any(|window| {
        window
            .iter()
            .zip(needle)
            .all(|(h, n)| h.as_ref() == n.as_ref())
    })
}
