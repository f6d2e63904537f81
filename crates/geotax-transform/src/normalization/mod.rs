//! Record normalization steps.
//!
//! Run in order: project the listing columns, null out missing tokens and
//! deduplicate on coordinates, split coordinates, then map the primary
//! category and the category list through the taxonomy table.

mod categories;
mod coordinates;
mod records;

pub use categories::{MAP_CATEGORIES, MAP_MAIN_CATEGORY, map_categories, map_main_category};
pub use coordinates::{SPLIT_COORDINATES, split_coordinates, split_pair};
pub use records::{
    DROP_MISSING_AND_DUPLICATES, SELECT_COLUMNS, drop_missing_and_duplicates, select_columns,
};
