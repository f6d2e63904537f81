//! Domain filtering and primary-category reclassification.

use geotax_model::schema::{
    CATEGORIES, MAIN_CATEGORY, MULTIPLE_CATEGORIES, join_categories, split_categories,
};
use geotax_model::{KeywordSets, StepReport};
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::Result;
use crate::frame::{filter_rows, replace_string_column, string_column};

pub const FILTER_DOMAIN: &str = "filter_domain";

/// Primary category for a record after its list was narrowed.
///
/// A primary category already in the reclassification set is kept. Otherwise
/// a list holding exactly one reclassification tag promotes that tag, and
/// anything else becomes [`MULTIPLE_CATEGORIES`].
pub fn reclassify<'a>(main: &'a str, narrowed: &[&'a str], keywords: &KeywordSets) -> &'a str {
    if keywords.reclassify.contains(main) {
        return main;
    }
    match narrowed {
        [only] if keywords.reclassify.contains(*only) => *only,
        _ => MULTIPLE_CATEGORIES,
    }
}

/// Keep records of the target domain and reclassify their primary category.
///
/// 1. keep rows whose `main_category` is in the broad set
/// 2. keep rows whose `categories` hold at least one narrow tag
/// 3. drop non-narrow tags from `categories`, keeping order
/// 4. rewrite `main_category` with [`reclassify`]
pub fn filter_domain(df: &DataFrame, keywords: &KeywordSets) -> Result<(DataFrame, StepReport)> {
    let rows_in = df.height();
    let mains = string_column(df, FILTER_DOMAIN, MAIN_CATEGORY)?;
    let lists = string_column(df, FILTER_DOMAIN, CATEGORIES)?;

    let mut keep = Vec::with_capacity(rows_in);
    let mut main_cells = Vec::new();
    let mut list_cells = Vec::new();
    let mut outside_broad = 0usize;
    let mut no_narrow_tag = 0usize;
    let mut reclassified = 0usize;

    for (main, list) in mains.into_iter().zip(lists) {
        let Some(main) = main.filter(|main| keywords.broad.contains(*main)) else {
            outside_broad += 1;
            keep.push(false);
            continue;
        };
        let narrowed: Vec<&str> = split_categories(list.unwrap_or_default())
            .into_iter()
            .filter(|tag| keywords.narrow.contains(*tag))
            .collect();
        if narrowed.is_empty() {
            no_narrow_tag += 1;
            keep.push(false);
            continue;
        }

        let primary = reclassify(main, &narrowed, keywords);
        if primary != main {
            reclassified += 1;
        }
        keep.push(true);
        main_cells.push(Some(primary.to_string()));
        list_cells.push(Some(join_categories(&narrowed)));
    }

    let mut out = filter_rows(df, &keep)?;
    replace_string_column(&mut out, MAIN_CATEGORY, main_cells)?;
    replace_string_column(&mut out, CATEGORIES, list_cells)?;
    debug!(outside_broad, no_narrow_tag, reclassified, "domain filter applied");

    let report = StepReport::new(FILTER_DOMAIN, rows_in)
        .with_rows_out(out.height())
        .with_modified(reclassified)
        .with_count("outside_broad_set", outside_broad)
        .with_count("no_narrow_tag", no_narrow_tag)
        .with_count("reclassified", reclassified);
    Ok((out, report))
}
