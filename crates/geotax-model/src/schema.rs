//! Column names of the listing table.
//!
//! Columns keep the names used by the scraped input so that the output
//! artifact stays joinable with the raw files. `main_category` holds the
//! primary category, `categories` the ordered category list and
//! `coordinates` the raw `"<lat>,<lon>"` text.

pub const NAME: &str = "name";
pub const WEBSITE: &str = "website";
pub const MAIN_CATEGORY: &str = "main_category";
pub const CATEGORIES: &str = "categories";
pub const PHONE: &str = "phone";
pub const ADDRESS: &str = "address";
pub const COORDINATES: &str = "coordinates";
pub const LINK: &str = "link";

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

pub const COUNTRY: &str = "country";
pub const STATE: &str = "state";
pub const DEPARTMENT: &str = "department";

/// Projection applied by the normalizer, in output order.
pub const LISTING_COLUMNS: [&str; 8] = [
    NAME,
    WEBSITE,
    MAIN_CATEGORY,
    CATEGORIES,
    PHONE,
    ADDRESS,
    COORDINATES,
    LINK,
];

/// Region label columns added by the spatial join.
pub const REGION_COLUMNS: [&str; 3] = [COUNTRY, STATE, DEPARTMENT];

/// Primary category assigned when the category list does not single out one tag.
pub const MULTIPLE_CATEGORIES: &str = "multiple";

/// Separator between labels in a category cell, raw and canonical alike.
pub const CATEGORY_SEPARATOR: &str = ", ";

/// Cell values that the scraper writes for absent data.
pub const MISSING_TOKENS: [&str; 2] = ["", "None"];

/// Returns true if the cell text stands for a missing value.
pub fn is_missing_token(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

/// Decode a category cell into its ordered tags.
///
/// The empty cell is the empty list. Empty labels between separators are
/// dropped since they cannot survive a round trip through [`join_categories`].
pub fn split_categories(cell: &str) -> Vec<&str> {
    cell.split(CATEGORY_SEPARATOR)
        .filter(|label| !label.is_empty())
        .collect()
}

/// Encode ordered tags into a category cell.
pub fn join_categories<S: AsRef<str>>(tags: &[S]) -> String {
    let mut cell = String::new();
    for (pos, tag) in tags.iter().enumerate() {
        if pos > 0 {
            cell.push_str(CATEGORY_SEPARATOR);
        }
        cell.push_str(tag.as_ref());
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_is_empty_list() {
        assert!(split_categories("").is_empty());
        assert_eq!(join_categories::<&str>(&[]), "");
    }

    #[test]
    fn split_keeps_order_and_inner_spaces() {
        assert_eq!(
            split_categories("Dairy farm, Farm shop, Pig farm"),
            vec!["Dairy farm", "Farm shop", "Pig farm"]
        );
    }

    #[test]
    fn split_only_on_comma_space() {
        // The source separates labels with ", "; a bare comma belongs to the label.
        assert_eq!(split_categories("a,b, c"), vec!["a,b", "c"]);
    }

    #[test]
    fn missing_tokens() {
        assert!(is_missing_token(""));
        assert!(is_missing_token("None"));
        assert!(!is_missing_token("none"));
        assert!(!is_missing_token(" "));
    }
}
