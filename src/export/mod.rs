pub mod csv;

pub use self::csv::{write_labeled_csv, write_view_csv, REPORT_HEADER};
