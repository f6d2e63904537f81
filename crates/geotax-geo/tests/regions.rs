//! Region assignment against small boundary datasets.

use std::io::Write;

use geo::{MultiPolygon, Point, Rect, coord};
use geotax_geo::{
    BoundaryIndex, BoundaryPolygon, GeoError, assign_regions, build_points, listing_point,
};
use geotax_model::BoundaryConfig;
use geotax_model::schema::{COUNTRY, DEPARTMENT, LATITUDE, LONGITUDE, NAME, STATE};
use polars::prelude::{DataFrame, NamedFrom, Series};
use proptest::prelude::*;
use tempfile::NamedTempFile;

fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> MultiPolygon<f64> {
    let rect = Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y });
    MultiPolygon::new(vec![rect.to_polygon()])
}

/// A 4 x 4 grid of one-degree cells over northern Portugal.
fn grid() -> BoundaryIndex {
    let mut polygons = Vec::new();
    for i in 0..4 {
        for j in 0..4 {
            let lon = -10.0 + f64::from(i);
            let lat = 39.0 + f64::from(j);
            polygons.push(BoundaryPolygon::new(
                "Portugal",
                format!("state-{j}"),
                format!("dept-{i}-{j}"),
                square(lon, lat, lon + 1.0, lat + 1.0),
            ));
        }
    }
    BoundaryIndex::from_polygons(polygons)
}

fn strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn inside_point_gets_polygon_labels_and_outside_is_dropped() {
    let df = DataFrame::new(vec![
        Series::new(NAME.into(), vec!["inside", "outside"]).into(),
        Series::new(LATITUDE.into(), vec!["41.5", "10.0"]).into(),
        Series::new(LONGITUDE.into(), vec!["-8.5", "10.0"]).into(),
    ])
    .unwrap();

    let (df, _) = build_points(&df).unwrap();
    let (df, report) = assign_regions(&df, &grid()).unwrap();

    assert_eq!(strings(&df, NAME), vec!["inside"]);
    assert_eq!(strings(&df, COUNTRY), vec!["Portugal"]);
    assert_eq!(strings(&df, STATE), vec!["state-2"]);
    assert_eq!(strings(&df, DEPARTMENT), vec!["dept-1-2"]);
    assert_eq!(report.count("unmatched"), 1);
}

#[test]
fn latitude_and_longitude_are_not_swapped() {
    // Only a lat/lon swap would put (lat 5.5, lon 45.5) inside this box.
    let index = BoundaryIndex::from_polygons(vec![BoundaryPolygon::new(
        "X",
        "x",
        "x1",
        square(45.0, 5.0, 46.0, 6.0),
    )]);
    let df = DataFrame::new(vec![
        Series::new(LATITUDE.into(), vec![45.5, 5.5]).into(),
        Series::new(LONGITUDE.into(), vec![5.5, 45.5]).into(),
    ])
    .unwrap();

    let (df, _) = assign_regions(&df, &index).unwrap();

    assert_eq!(df.height(), 1);
    assert_eq!(df.column(LATITUDE).unwrap().f64().unwrap().get(0), Some(5.5));
}

#[test]
fn point_on_shared_edge_is_dropped() {
    let index = BoundaryIndex::from_polygons(vec![
        BoundaryPolygon::new("X", "west", "w1", square(0.0, 0.0, 1.0, 1.0)),
        BoundaryPolygon::new("X", "east", "e1", square(1.0, 0.0, 2.0, 1.0)),
    ]);
    let df = DataFrame::new(vec![
        Series::new(LATITUDE.into(), vec![0.5, 0.5]).into(),
        Series::new(LONGITUDE.into(), vec![1.0, 1.5]).into(),
    ])
    .unwrap();

    let (df, report) = assign_regions(&df, &index).unwrap();

    assert_eq!(strings(&df, STATE), vec!["east"]);
    assert_eq!(report.count("unmatched"), 1);
    assert_eq!(report.count("multiple_matches"), 0);
}

#[test]
fn text_coordinates_are_rejected_as_recoverable() {
    let df = DataFrame::new(vec![
        Series::new(LATITUDE.into(), vec!["41.5"]).into(),
        Series::new(LONGITUDE.into(), vec!["-8.5"]).into(),
    ])
    .unwrap();

    let err = assign_regions(&df, &grid()).unwrap_err();

    assert!(err.is_recoverable());
}

#[test]
fn load_geojson_file() {
    let mut file = NamedTempFile::with_suffix(".geojson").unwrap();
    write!(
        file,
        r#"{{"type": "FeatureCollection", "features": [
            {{"type": "Feature",
              "properties": {{"COUNTRY": "Portugal", "NAME_1": "Porto", "NAME_2": "Maia"}},
              "geometry": {{"type": "Polygon",
                           "coordinates": [[[-9,41],[-8,41],[-8,42],[-9,42],[-9,41]]]}}}}
        ]}}"#
    )
    .unwrap();

    let index = BoundaryIndex::load(file.path(), &BoundaryConfig::default()).unwrap();

    assert_eq!(index.len(), 1);
    let hit = index.locate(&listing_point(41.2, -8.6)).unwrap();
    assert_eq!(hit.region.department, "Maia");
}

#[test]
fn missing_boundary_file() {
    let err = BoundaryIndex::load(
        std::path::Path::new("/nonexistent/regions.geojson"),
        &BoundaryConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, GeoError::FileNotFound { .. }));
}

proptest! {
    #[test]
    fn index_agrees_with_naive_scan(lon in -11.0f64..-5.0, lat in 38.0f64..44.0) {
        let index = grid();
        let point = Point::new(lon, lat);

        let naive = index
            .polygons()
            .iter()
            .find(|polygon| polygon.contains(&point))
            .map(|polygon| polygon.department.clone());
        let indexed = index.locate(&point).map(|hit| hit.region.department.clone());

        prop_assert_eq!(indexed, naive);
    }
}
