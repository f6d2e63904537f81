//! Column projection, missing-value handling and coordinate deduplication.

use std::collections::HashSet;

use geotax_model::StepReport;
use geotax_model::schema::{COORDINATES, LISTING_COLUMNS, is_missing_token};
use polars::prelude::{DataFrame, DataType};
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::frame::{filter_rows, replace_string_column, string_column};

pub const SELECT_COLUMNS: &str = "select_columns";
pub const DROP_MISSING_AND_DUPLICATES: &str = "drop_missing_and_duplicates";

/// Project the table onto the listing columns, in listing order.
///
/// Fails with [`TransformError::MissingColumn`] naming the first absent
/// listing column.
pub fn select_columns(df: &DataFrame) -> Result<(DataFrame, StepReport)> {
    let rows_in = df.height();
    if let Some(missing) = LISTING_COLUMNS
        .iter()
        .find(|name| df.column(name).is_err())
    {
        return Err(TransformError::MissingColumn {
            step: SELECT_COLUMNS,
            column: (*missing).to_string(),
        });
    }

    let selected = df.select(LISTING_COLUMNS)?;
    let removed = df.width() - selected.width();
    debug!(removed, "unwanted columns removed");

    let report = StepReport::new(SELECT_COLUMNS, rows_in).with_count("columns_removed", removed);
    Ok((selected, report))
}

/// Null out missing-value tokens, then drop rows without coordinates and
/// rows repeating an earlier row's coordinates.
///
/// Every string column has `""` and `"None"` replaced by null. Of rows
/// sharing a coordinate string only the first in input order is kept.
pub fn drop_missing_and_duplicates(df: &DataFrame) -> Result<(DataFrame, StepReport)> {
    let rows_in = df.height();
    string_column(df, DROP_MISSING_AND_DUPLICATES, COORDINATES)?;

    let mut cleaned = df.clone();
    let mut tokens_replaced = 0usize;
    let string_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| col.dtype() == &DataType::String)
        .map(|col| col.name().to_string())
        .collect();
    for name in &string_columns {
        let values = df.column(name)?.str()?;
        let mut replaced = 0usize;
        let cells: Vec<Option<String>> = values
            .into_iter()
            .map(|value| match value {
                Some(text) if is_missing_token(text) => {
                    replaced += 1;
                    None
                }
                other => other.map(str::to_string),
            })
            .collect();
        if replaced > 0 {
            replace_string_column(&mut cleaned, name, cells)?;
            tokens_replaced += replaced;
        }
    }

    let coordinates = cleaned.column(COORDINATES)?.str()?;
    let mut seen: HashSet<&str> = HashSet::with_capacity(rows_in);
    let mut keep = Vec::with_capacity(rows_in);
    let mut missing = 0usize;
    let mut duplicates = 0usize;
    for value in coordinates {
        match value {
            None => {
                missing += 1;
                keep.push(false);
            }
            Some(text) if !seen.insert(text) => {
                duplicates += 1;
                keep.push(false);
            }
            Some(_) => keep.push(true),
        }
    }
    let filtered = filter_rows(&cleaned, &keep)?;
    debug!(missing, duplicates, "rows without or with repeated coordinates removed");

    let report = StepReport::new(DROP_MISSING_AND_DUPLICATES, rows_in)
        .with_rows_out(filtered.height())
        .with_count("missing_tokens_replaced", tokens_replaced)
        .with_count("missing_coordinates", missing)
        .with_count("duplicate_coordinates", duplicates);
    Ok((filtered, report))
}
