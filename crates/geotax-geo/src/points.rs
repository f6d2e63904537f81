//! Point construction from the coordinate columns.

use geo::Point;
use geotax_ingest::any_to_f64;
use geotax_model::StepReport;
use geotax_model::schema::{LATITUDE, LONGITUDE};
use geotax_transform::TransformError;
use geotax_transform::frame::filter_rows;
use polars::prelude::{AnyValue, Column, DataFrame, DataType, Float64Chunked, IntoSeries};

pub const BUILD_POINTS: &str = "build_points";

/// Point for a listing. x is the longitude and y the latitude.
///
/// ```
/// let point = geotax_geo::listing_point(41.15, -8.61);
/// assert_eq!(point.x(), -8.61);
/// assert_eq!(point.y(), 41.15);
/// ```
pub fn listing_point(latitude: f64, longitude: f64) -> Point<f64> {
    Point::new(longitude, latitude)
}

/// Convert `latitude` and `longitude` to `Float64`, dropping rows that cannot form a point.
///
/// Both text and numeric columns are accepted. Rows with a missing or
/// unparsable longitude are dropped first; rows with a usable longitude but
/// no usable latitude are dropped and counted separately. Out-of-range values
/// are kept and fall outside every boundary polygon later.
pub fn build_points(df: &DataFrame) -> geotax_transform::Result<(DataFrame, StepReport)> {
    let rows_in = df.height();
    let latitudes = coordinate_values(df, LATITUDE)?;
    let longitudes = coordinate_values(df, LONGITUDE)?;

    let mut keep = Vec::with_capacity(rows_in);
    let mut kept_lat = Vec::with_capacity(rows_in);
    let mut kept_lon = Vec::with_capacity(rows_in);
    let mut missing_longitude = 0usize;
    let mut missing_latitude = 0usize;
    for (latitude, longitude) in latitudes.into_iter().zip(longitudes) {
        match (latitude, longitude) {
            (_, None) => {
                missing_longitude += 1;
                keep.push(false);
            }
            (None, Some(_)) => {
                missing_latitude += 1;
                keep.push(false);
            }
            (Some(lat), Some(lon)) => {
                kept_lat.push(lat);
                kept_lon.push(lon);
                keep.push(true);
            }
        }
    }

    let mut out = filter_rows(df, &keep)?;
    out.with_column(Float64Chunked::from_vec(LATITUDE.into(), kept_lat).into_series())?;
    out.with_column(Float64Chunked::from_vec(LONGITUDE.into(), kept_lon).into_series())?;

    let report = StepReport::new(BUILD_POINTS, rows_in)
        .with_rows_out(out.height())
        .with_count("missing_longitude", missing_longitude)
        .with_count("missing_latitude", missing_latitude);
    Ok((out, report))
}

fn coordinate_values(df: &DataFrame, name: &str) -> geotax_transform::Result<Vec<Option<f64>>> {
    let column = df.column(name).map_err(|_| TransformError::MissingColumn {
        step: BUILD_POINTS,
        column: name.to_string(),
    })?;
    if !(column.dtype() == &DataType::String || column.dtype().is_primitive_numeric()) {
        return Err(TransformError::UnexpectedType {
            step: BUILD_POINTS,
            column: name.to_string(),
            dtype: column.dtype().to_string(),
            expected: "str or numeric",
        });
    }
    Ok(values(column))
}

fn values(column: &Column) -> Vec<Option<f64>> {
    (0..column.len())
        .map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)).filter(|v| v.is_finite()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    #[test]
    fn test_build_points_from_text() {
        let df = DataFrame::new(vec![
            Series::new("name".into(), vec!["a", "b", "c", "d"]).into(),
            Series::new(
                LATITUDE.into(),
                vec![Some("41.1"), Some("41.2"), None, Some("x")],
            )
            .into(),
            Series::new(
                LONGITUDE.into(),
                vec![Some("-8.6"), None, Some("-8.0"), Some("-7.5")],
            )
            .into(),
        ])
        .unwrap();

        let (out, report) = build_points(&df).unwrap();

        assert_eq!(out.height(), 1);
        assert_eq!(out.column(LATITUDE).unwrap().dtype(), &DataType::Float64);
        assert_eq!(out.column(LONGITUDE).unwrap().f64().unwrap().get(0), Some(-8.6));
        assert_eq!(report.count("missing_longitude"), 1);
        assert_eq!(report.count("missing_latitude"), 2);
    }

    #[test]
    fn test_build_points_from_numeric() {
        let df = DataFrame::new(vec![
            Series::new(LATITUDE.into(), vec![38.7, 95.0]).into(),
            Series::new(LONGITUDE.into(), vec![-9.1, 10.0]).into(),
        ])
        .unwrap();

        let (out, report) = build_points(&df).unwrap();

        assert_eq!(out.height(), 2);
        assert_eq!(report.rows_removed(), 0);
    }

    #[test]
    fn test_missing_longitude_column_is_recoverable() {
        let df = DataFrame::new(vec![Series::new(LATITUDE.into(), vec!["41.1"]).into()]).unwrap();

        let err = build_points(&df).unwrap_err();

        assert!(err.is_recoverable());
    }

    #[test]
    fn test_point_axis_order() {
        let point = listing_point(41.15, -8.61);
        assert_eq!((point.x(), point.y()), (-8.61, 41.15));
    }
}
