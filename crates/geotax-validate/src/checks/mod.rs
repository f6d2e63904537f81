//! Validation check modules.
//!
//! Each module performs a specific type of validation check.

mod nulls;
pub mod outliers;

use polars::prelude::DataFrame;
use tracing::debug;

use crate::report::ValidationReport;

/// Run all validation checks on the final table. Never modifies it.
pub fn run_all(df: &DataFrame) -> ValidationReport {
    let mut report = ValidationReport::new();

    // 1. Columns with null values
    for finding in nulls::check(df) {
        report.add(finding);
    }

    // 2. Outliers in numeric columns (mean +/- 2 std)
    for finding in outliers::check(df) {
        report.add(finding);
    }

    debug!(
        rows = df.height(),
        columns = df.width(),
        findings = report.findings.len(),
        "validation checks complete"
    );
    report
}
