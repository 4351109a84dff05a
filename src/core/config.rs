use std::path::PathBuf;
use crate::analysis::extractor::ExtractorConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_path: PathBuf,

    pub top_n: usize,                 // Top games by name
    pub publisher_top_n: usize,       // Top publishers

    pub cache_capacity: usize,        // Cached filtered views, 0 disables

    pub parallel_threshold: usize,    // Rows before filtering goes to the pool
    pub worker_threads: usize,

    pub extractor: ExtractorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_path: PathBuf::from("gamesales.csv"),

            top_n: 10,
            publisher_top_n: 10,

            cache_capacity: 256,

            parallel_threshold: 50_000,
            worker_threads: num_cpus::get(),

            extractor: ExtractorConfig::default(),
        }
    }
}

impl Config {
    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }
}
