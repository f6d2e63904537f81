//! Column access helpers shared by the steps.

use std::collections::BTreeMap;

use polars::prelude::{
    BooleanChunked, DataFrame, DataType, IntoSeries, NewChunkedArray, StringChunked,
    StringChunkedBuilder,
};

use crate::error::{Result, TransformError};

/// Borrow `column` as a string column, or fail with a recoverable error.
pub fn string_column<'a>(
    df: &'a DataFrame,
    step: &'static str,
    column: &str,
) -> Result<&'a StringChunked> {
    let Ok(col) = df.column(column) else {
        return Err(TransformError::MissingColumn {
            step,
            column: column.to_string(),
        });
    };
    if col.dtype() != &DataType::String {
        return Err(TransformError::UnexpectedType {
            step,
            column: column.to_string(),
            dtype: col.dtype().to_string(),
            expected: "str",
        });
    }
    Ok(col.str()?)
}

/// Keep the rows whose mask entry is true.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Non-null value counts of a string column.
///
/// Null cells are not counted. An empty category list is reported under the
/// empty string.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<BTreeMap<String, usize>> {
    let values = string_column(df, "value_counts", column)?;
    let mut counts = BTreeMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Replace `column` with the given cells.
pub fn replace_string_column(
    df: &mut DataFrame,
    column: &str,
    cells: Vec<Option<String>>,
) -> Result<()> {
    let mut builder = StringChunkedBuilder::new(column.into(), cells.len());
    for cell in cells {
        match cell {
            Some(value) => builder.append_value(value),
            None => builder.append_null(),
        }
    }
    df.with_column(builder.finish().into_series())?;
    Ok(())
}
