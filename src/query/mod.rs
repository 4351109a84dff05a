pub mod criteria;
pub mod parser;
pub mod matcher;
pub mod filter;
pub mod view;
pub mod cache;

pub use criteria::{CriteriaKey, FacetSet, FilterCriteria};
pub use filter::{apply, FilterEngine};
pub use parser::CriteriaParser;
pub use view::FilteredView;
