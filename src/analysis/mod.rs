pub mod token;
pub mod tokenizer;
pub mod vocabulary;
pub mod regions;
pub mod extractor;

pub use extractor::{extract, ExtractorConfig, MatchMode, NlExtractor};
pub use vocabulary::Vocabulary;
