//! Pass/fail bookkeeping and the textual report.
mod summary;
mod types;


pub use summary::report_lines;
pub use types::{TestRecord, TestResults, TestStatus};
