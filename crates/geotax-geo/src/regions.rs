//! Region assignment by containment join.

use geotax_model::StepReport;
use geotax_model::schema::{COUNTRY, DEPARTMENT, LATITUDE, LONGITUDE, STATE};
use geotax_transform::TransformError;
use geotax_transform::frame::{filter_rows, replace_string_column};
use polars::prelude::{DataFrame, DataType, Float64Chunked};
use tracing::warn;

use crate::boundary::BoundaryIndex;
use crate::points::listing_point;

pub const ASSIGN_REGIONS: &str = "assign_regions";

/// Attach `country`, `state` and `department` from the containing polygon.
///
/// Expects `Float64` coordinate columns as produced by
/// [`build_points`](crate::build_points). Rows outside every polygon are
/// dropped. A point inside several polygons takes the first in dataset order
/// and is counted under `multiple_matches`. A point lying exactly on an edge
/// shared by two polygons is contained by neither and is dropped as
/// `unmatched`; it is not given the first polygon.
pub fn assign_regions(
    df: &DataFrame,
    index: &BoundaryIndex,
) -> geotax_transform::Result<(DataFrame, StepReport)> {
    let rows_in = df.height();
    let latitudes = float_column(df, LATITUDE)?;
    let longitudes = float_column(df, LONGITUDE)?;

    let mut keep = Vec::with_capacity(rows_in);
    let mut countries = Vec::new();
    let mut states = Vec::new();
    let mut departments = Vec::new();
    let mut unmatched = 0usize;
    let mut multiple = 0usize;
    for (latitude, longitude) in latitudes.into_iter().zip(longitudes) {
        let hit = match (latitude, longitude) {
            (Some(lat), Some(lon)) => index.locate(&listing_point(lat, lon)),
            _ => None,
        };
        let Some(hit) = hit else {
            unmatched += 1;
            keep.push(false);
            continue;
        };
        if hit.matches > 1 {
            multiple += 1;
        }
        keep.push(true);
        countries.push(Some(hit.region.country.clone()));
        states.push(Some(hit.region.state.clone()));
        departments.push(Some(hit.region.department.clone()));
    }

    if multiple > 0 {
        warn!(
            rows = multiple,
            "points inside more than one boundary polygon, first polygon used"
        );
    }

    let mut out = filter_rows(df, &keep)?;
    replace_string_column(&mut out, COUNTRY, countries)?;
    replace_string_column(&mut out, STATE, states)?;
    replace_string_column(&mut out, DEPARTMENT, departments)?;

    let report = StepReport::new(ASSIGN_REGIONS, rows_in)
        .with_rows_out(out.height())
        .with_modified(out.height())
        .with_count("unmatched", unmatched)
        .with_count("multiple_matches", multiple);
    Ok((out, report))
}

fn float_column<'a>(
    df: &'a DataFrame,
    name: &str,
) -> geotax_transform::Result<&'a Float64Chunked> {
    let Ok(column) = df.column(name) else {
        return Err(TransformError::MissingColumn {
            step: ASSIGN_REGIONS,
            column: name.to_string(),
        });
    };
    if column.dtype() != &DataType::Float64 {
        return Err(TransformError::UnexpectedType {
            step: ASSIGN_REGIONS,
            column: name.to_string(),
            dtype: column.dtype().to_string(),
            expected: "f64",
        });
    }
    Ok(column.f64()?)
}
