//! Null coverage.

use polars::prelude::DataFrame;

use crate::finding::Finding;

/// One finding per column holding at least one null, in column order.
pub fn check(df: &DataFrame) -> Vec<Finding> {
    df.get_columns()
        .iter()
        .filter(|column| column.null_count() > 0)
        .map(|column| Finding::NullValues {
            column: column.name().to_string(),
            null_count: column.null_count(),
        })
        .collect()
}
