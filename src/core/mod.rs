pub mod types;
pub mod dataset;
pub mod config;
pub mod error;
