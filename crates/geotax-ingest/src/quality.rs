//! Input quality profile, taken before any transformation step runs.

use std::collections::{BTreeMap, BTreeSet};

use geotax_model::schema::is_missing_token;
use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;

use crate::values::any_to_string;

/// Missing-cell and duplicate-row figures for a freshly loaded table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestQuality {
    pub rows: usize,
    pub columns: usize,
    /// Cells that are null or hold a missing-value token.
    pub missing_cells: usize,
    pub missing_percent: f64,
    /// Rows identical to an earlier row in every column.
    pub duplicate_rows: usize,
    pub duplicate_percent: f64,
    /// Per column, non-missing values that repeat an earlier value.
    pub duplicates_by_column: BTreeMap<String, usize>,
}

/// Profiles `df` without modifying it.
pub fn profile_frame(df: &DataFrame) -> IngestQuality {
    let rows = df.height();
    let columns = df.width();

    let mut cells: Vec<Vec<Option<String>>> = Vec::with_capacity(columns);
    let mut missing_cells = 0usize;
    let mut duplicates_by_column = BTreeMap::new();

    for column in df.get_columns() {
        let mut values = Vec::with_capacity(rows);
        let mut seen = BTreeSet::new();
        let mut repeats = 0usize;
        for idx in 0..rows {
            let value = match column.get(idx).unwrap_or(AnyValue::Null) {
                AnyValue::Null => None,
                other => Some(any_to_string(other)),
            };
            match value.as_deref() {
                Some(text) if !is_missing_token(text) => {
                    if !seen.insert(text.to_string()) {
                        repeats += 1;
                    }
                }
                _ => missing_cells += 1,
            }
            values.push(value);
        }
        duplicates_by_column.insert(column.name().to_string(), repeats);
        cells.push(values);
    }

    let mut seen_rows = BTreeSet::new();
    let mut duplicate_rows = 0usize;
    for idx in 0..rows {
        let key: Vec<Option<&str>> = cells.iter().map(|col| col[idx].as_deref()).collect();
        if !seen_rows.insert(key) {
            duplicate_rows += 1;
        }
    }

    IngestQuality {
        rows,
        columns,
        missing_cells,
        missing_percent: percent(missing_cells, rows * columns),
        duplicate_rows,
        duplicate_percent: percent(duplicate_rows, rows),
        duplicates_by_column,
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
