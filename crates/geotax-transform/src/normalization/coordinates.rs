//! Splitting the raw `"<lat>,<lon>"` text into coordinate columns.

use geotax_model::StepReport;
use geotax_model::schema::{COORDINATES, LATITUDE, LONGITUDE, is_missing_token};
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::frame::{replace_string_column, string_column};

pub const SPLIT_COORDINATES: &str = "split_coordinates";

/// Split a coordinate cell into trimmed `(latitude, longitude)` text.
///
/// Returns `None` unless the cell has exactly two non-missing parts.
///
/// ```
/// use geotax_transform::normalization::split_pair;
///
/// assert_eq!(split_pair("41.15, -8.61"), Some(("41.15", "-8.61")));
/// assert_eq!(split_pair("41.15,None"), None);
/// assert_eq!(split_pair("1,2,3"), None);
/// ```
pub fn split_pair(cell: &str) -> Option<(&str, &str)> {
    let mut parts = cell.split(',');
    let latitude = parts.next()?.trim();
    let longitude = parts.next()?.trim();
    if parts.next().is_some() || is_missing_token(latitude) || is_missing_token(longitude) {
        return None;
    }
    Some((latitude, longitude))
}

/// Add `latitude` and `longitude` text columns derived from `coordinates`.
///
/// Malformed cells give nulls in both columns; the row itself is kept and
/// dropped later when no point can be built for it.
pub fn split_coordinates(df: &DataFrame) -> Result<(DataFrame, StepReport)> {
    let rows_in = df.height();
    let coordinates = string_column(df, SPLIT_COORDINATES, COORDINATES)?;

    let mut latitudes = Vec::with_capacity(rows_in);
    let mut longitudes = Vec::with_capacity(rows_in);
    let mut malformed = 0usize;
    for cell in coordinates {
        match cell.and_then(split_pair) {
            Some((latitude, longitude)) => {
                latitudes.push(Some(latitude.to_string()));
                longitudes.push(Some(longitude.to_string()));
            }
            None => {
                malformed += 1;
                latitudes.push(None);
                longitudes.push(None);
            }
        }
    }

    let mut out = df.clone();
    replace_string_column(&mut out, LATITUDE, latitudes)?;
    replace_string_column(&mut out, LONGITUDE, longitudes)?;

    let report = StepReport::new(SPLIT_COORDINATES, rows_in)
        .with_modified(rows_in - malformed)
        .with_count("malformed_coordinates", malformed);
    Ok((out, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    #[test]
    fn test_split_coordinates() {
        let df = DataFrame::new(vec![
            Series::new(
                COORDINATES.into(),
                vec![Some("41.15,-8.61"), Some("oops"), None, Some("None,-8.0")],
            )
            .into(),
        ])
        .unwrap();

        let (out, report) = split_coordinates(&df).unwrap();

        let lat = out.column(LATITUDE).unwrap().str().unwrap();
        let lon = out.column(LONGITUDE).unwrap().str().unwrap();
        assert_eq!(lat.get(0), Some("41.15"));
        assert_eq!(lon.get(0), Some("-8.61"));
        assert_eq!(lat.null_count(), 3);
        assert_eq!(lon.null_count(), 3);
        assert_eq!(report.rows_out, 4);
        assert_eq!(report.rows_modified, 1);
        assert_eq!(report.count("malformed_coordinates"), 3);
    }

    #[test]
    fn test_split_pair_trims_parts() {
        assert_eq!(split_pair(" 38.7 ,  -9.1 "), Some(("38.7", "-9.1")));
        assert_eq!(split_pair("38.7"), None);
        assert_eq!(split_pair(",-9.1"), None);
    }
}
