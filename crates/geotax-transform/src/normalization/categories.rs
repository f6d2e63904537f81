//! Taxonomy mapping of the primary category and the category list.

use geotax_model::schema::{CATEGORIES, MAIN_CATEGORY, join_categories, split_categories};
use geotax_model::{StepReport, TaxonomyTable};
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::frame::{replace_string_column, string_column};

pub const MAP_MAIN_CATEGORY: &str = "map_main_category";
pub const MAP_CATEGORIES: &str = "map_categories";

/// Replace each `main_category` with its canonical tag. Nulls stay null.
pub fn map_main_category(
    df: &DataFrame,
    taxonomy: &TaxonomyTable,
) -> Result<(DataFrame, StepReport)> {
    let rows_in = df.height();
    let values = string_column(df, MAP_MAIN_CATEGORY, MAIN_CATEGORY)?;

    let mut changed = 0usize;
    let cells: Vec<Option<String>> = values
        .into_iter()
        .map(|value| {
            value.map(|raw| {
                let canonical = taxonomy.canonical(raw);
                if canonical != raw {
                    changed += 1;
                }
                canonical
            })
        })
        .collect();

    let mut out = df.clone();
    replace_string_column(&mut out, MAIN_CATEGORY, cells)?;

    let report = StepReport::new(MAP_MAIN_CATEGORY, rows_in).with_modified(changed);
    Ok((out, report))
}

/// Map every label of the `categories` list, keeping list order.
///
/// A null cell becomes the empty list.
pub fn map_categories(df: &DataFrame, taxonomy: &TaxonomyTable) -> Result<(DataFrame, StepReport)> {
    let rows_in = df.height();
    let values = string_column(df, MAP_CATEGORIES, CATEGORIES)?;

    let mut changed = 0usize;
    let mut empty = 0usize;
    let cells: Vec<Option<String>> = values
        .into_iter()
        .map(|value| {
            let raw = value.unwrap_or_default();
            let tags: Vec<String> = split_categories(raw)
                .into_iter()
                .map(|label| taxonomy.canonical(label))
                .collect();
            let cell = join_categories(&tags);
            if tags.is_empty() {
                empty += 1;
            }
            if value.is_some_and(|raw| raw != cell) {
                changed += 1;
            }
            Some(cell)
        })
        .collect();

    let mut out = df.clone();
    replace_string_column(&mut out, CATEGORIES, cells)?;

    let report = StepReport::new(MAP_CATEGORIES, rows_in)
        .with_modified(changed)
        .with_count("empty_lists", empty);
    Ok((out, report))
}
