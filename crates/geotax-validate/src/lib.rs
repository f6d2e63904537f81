//! Validation of the final listing table.
//!
//! Checks are informational. They report null coverage per column and
//! outliers in numeric columns, and never remove rows.

pub mod checks;
mod finding;
mod report;

pub use checks::outliers::find_outliers;
pub use checks::run_all;
pub use finding::Finding;
pub use report::ValidationReport;
