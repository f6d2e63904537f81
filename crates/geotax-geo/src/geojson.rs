//! GeoJSON FeatureCollection reading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use geotax_model::BoundaryConfig;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::boundary::BoundaryPolygon;
use crate::error::{GeoError, Result};

#[derive(Debug, Deserialize)]
struct GeoJsonRoot {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

type Ring = Vec<Vec<f64>>;

/// Read the polygon features of a FeatureCollection.
///
/// `Polygon` and `MultiPolygon` features become [`BoundaryPolygon`]s in file
/// order. Features with another geometry type, or none, are skipped.
pub fn read_boundaries(path: &Path, config: &BoundaryConfig) -> Result<Vec<BoundaryPolygon>> {
    let file = File::open(path).map_err(|e| GeoError::open(path, e))?;
    let root: GeoJsonRoot =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| GeoError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    parse_root(root, path, config)
}

/// Parse polygon features from GeoJSON text. `origin` names the source in errors.
pub fn parse_boundaries(
    source: &str,
    origin: &Path,
    config: &BoundaryConfig,
) -> Result<Vec<BoundaryPolygon>> {
    let root: GeoJsonRoot = serde_json::from_str(source).map_err(|source| GeoError::Json {
        path: origin.to_path_buf(),
        source,
    })?;
    parse_root(root, origin, config)
}

fn parse_root(root: GeoJsonRoot, path: &Path, config: &BoundaryConfig) -> Result<Vec<BoundaryPolygon>> {
    if root.kind != "FeatureCollection" {
        return Err(GeoError::NotFeatureCollection {
            path: path.to_path_buf(),
            found: root.kind,
        });
    }

    let mut polygons = Vec::with_capacity(root.features.len());
    let mut skipped = 0usize;
    for (feature_idx, feature) in root.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            skipped += 1;
            continue;
        };
        let invalid = |message: String| GeoError::InvalidGeometry {
            path: path.to_path_buf(),
            feature: feature_idx,
            message,
        };
        let shape = match geometry.kind.as_str() {
            "Polygon" => {
                let rings: Vec<Ring> =
                    serde_json::from_value(geometry.coordinates).map_err(|e| invalid(e.to_string()))?;
                MultiPolygon::new(vec![polygon(rings).map_err(invalid)?])
            }
            "MultiPolygon" => {
                let parts: Vec<Vec<Ring>> =
                    serde_json::from_value(geometry.coordinates).map_err(|e| invalid(e.to_string()))?;
                let parts = parts
                    .into_iter()
                    .map(polygon)
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(invalid)?;
                MultiPolygon::new(parts)
            }
            other => {
                debug!(feature = feature_idx, geometry = other, "non-polygon feature skipped");
                skipped += 1;
                continue;
            }
        };

        let properties = feature.properties.unwrap_or_default();
        let label = |property: &str| {
            property_text(&properties, property).ok_or_else(|| GeoError::MissingProperty {
                path: path.to_path_buf(),
                feature: feature_idx,
                property: property.to_string(),
            })
        };
        polygons.push(BoundaryPolygon {
            country: label(config.country_field.as_str())?,
            state: label(config.state_field.as_str())?,
            department: label(config.department_field.as_str())?,
            geometry: shape,
        });
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "features without polygon geometry skipped");
    }
    if polygons.is_empty() {
        return Err(GeoError::NoPolygons {
            path: path.to_path_buf(),
        });
    }
    Ok(polygons)
}

fn polygon(rings: Vec<Ring>) -> std::result::Result<Polygon<f64>, String> {
    let mut rings = rings.into_iter().map(line_string);
    let exterior = rings
        .next()
        .ok_or_else(|| "polygon has no rings".to_string())??;
    let interiors = rings.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn line_string(ring: Ring) -> std::result::Result<LineString<f64>, String> {
    if ring.len() < 3 {
        return Err(format!("ring has {} positions, expected at least 3", ring.len()));
    }
    ring.into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
            _ => Err(format!("invalid position {position:?}")),
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(LineString::new)
}

/// Label text of a property. Numbers are accepted; null and other JSON types are not.
fn property_text(properties: &Map<String, Value>, name: &str) -> Option<String> {
    match properties.get(name)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
