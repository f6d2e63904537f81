//! Attribute derived from the final primary category.

use geotax_model::schema::MAIN_CATEGORY;
use geotax_model::{DerivedAttribute, StepReport};
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::frame::{replace_string_column, string_column};

pub const DERIVE_ATTRIBUTE: &str = "derive_attribute";

/// Add the derived column by looking up each `main_category`.
///
/// Unmapped and null categories get the attribute's fallback value.
pub fn derive_attribute(
    df: &DataFrame,
    attribute: &DerivedAttribute,
) -> Result<(DataFrame, StepReport)> {
    let rows_in = df.height();
    let mains = string_column(df, DERIVE_ATTRIBUTE, MAIN_CATEGORY)?;

    let mut fallbacks = 0usize;
    let cells: Vec<Option<String>> = mains
        .into_iter()
        .map(|main| {
            if !main.is_some_and(|main| attribute.mapping.contains_key(main)) {
                fallbacks += 1;
            }
            Some(attribute.value_for(main).to_string())
        })
        .collect();

    let mut out = df.clone();
    replace_string_column(&mut out, &attribute.column, cells)?;

    let report = StepReport::new(DERIVE_ATTRIBUTE, rows_in)
        .with_modified(rows_in)
        .with_count("fallback_values", fallbacks);
    Ok((out, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    #[test]
    fn test_derive_attribute_with_fallback() {
        let attribute = DerivedAttribute::new("animal_type")
            .with_entry("dairy_farm", "cows")
            .with_entry("fish_farm", "fish");
        let df = DataFrame::new(vec![
            Series::new(
                MAIN_CATEGORY.into(),
                vec![Some("dairy_farm"), Some("multiple"), None, Some("fish_farm")],
            )
            .into(),
        ])
        .unwrap();

        let (out, report) = derive_attribute(&df, &attribute).unwrap();

        let values = out.column("animal_type").unwrap().str().unwrap();
        assert_eq!(
            values.into_iter().collect::<Vec<_>>(),
            vec![Some("cows"), Some("other"), Some("other"), Some("fish")]
        );
        assert_eq!(report.count("fallback_values"), 2);
    }

    #[test]
    fn test_missing_primary_column_is_recoverable() {
        let df = DataFrame::new(vec![Series::new("name".into(), vec!["Quinta"]).into()]).unwrap();
        let err = derive_attribute(&df, &DerivedAttribute::new("animal_type")).unwrap_err();

        assert!(err.is_recoverable());
    }
}
