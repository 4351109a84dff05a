pub mod sales_engine;

pub use sales_engine::{NlFilterSummary, SalesEngine};
