//! Boundary index for point-in-polygon lookups.
//!
//! Uses an R-tree (via `rstar`) over polygon bounding boxes to find
//! candidates, then an exact `geo::Contains` test on each candidate.

use std::path::Path;

use geo::{BoundingRect, Contains, MultiPolygon, Point};
use geotax_model::BoundaryConfig;
use rstar::{AABB, RTree, RTreeObject};
use tracing::info;

use crate::error::Result;
use crate::geojson::read_boundaries;

/// One administrative area with its region labels.
///
/// Coordinates are WGS84 with x = longitude and y = latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    pub country: String,
    pub state: String,
    pub department: String,
    pub geometry: MultiPolygon<f64>,
}

impl BoundaryPolygon {
    pub fn new(
        country: impl Into<String>,
        state: impl Into<String>,
        department: impl Into<String>,
        geometry: MultiPolygon<f64>,
    ) -> Self {
        Self {
            country: country.into(),
            state: state.into(),
            department: department.into(),
            geometry,
        }
    }

    /// True if the point lies in the polygon's interior. Points on an edge are outside.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.geometry.contains(point)
    }
}

/// Bounding box of a polygon, tagged with its position in the dataset.
#[derive(Debug, Clone)]
struct BoundaryEnvelope {
    aabb: AABB<[f64; 2]>,
    index: usize,
}

impl RTreeObject for BoundaryEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// Result of a lookup.
#[derive(Debug, Clone, Copy)]
pub struct RegionMatch<'a> {
    /// The first containing polygon in dataset order.
    pub region: &'a BoundaryPolygon,
    /// Number of polygons containing the point; above one means overlapping boundaries.
    pub matches: usize,
}

/// Immutable polygon set with a spatial index, built once per run.
pub struct BoundaryIndex {
    polygons: Vec<BoundaryPolygon>,
    tree: RTree<BoundaryEnvelope>,
}

impl std::fmt::Debug for BoundaryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryIndex")
            .field("polygons", &self.polygons.len())
            .finish_non_exhaustive()
    }
}

impl BoundaryIndex {
    /// Build the index. Polygons keep their order; it decides ties.
    pub fn from_polygons(polygons: Vec<BoundaryPolygon>) -> Self {
        let envelopes: Vec<BoundaryEnvelope> = polygons
            .iter()
            .enumerate()
            .filter_map(|(index, polygon)| {
                let rect = polygon.geometry.bounding_rect()?;
                Some(BoundaryEnvelope {
                    aabb: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                    index,
                })
            })
            .collect();
        Self {
            tree: RTree::bulk_load(envelopes),
            polygons,
        }
    }

    /// Load a GeoJSON FeatureCollection, reading labels from the configured properties.
    pub fn load(path: &Path, config: &BoundaryConfig) -> Result<Self> {
        let polygons = read_boundaries(path, config)?;
        info!(path = %path.display(), polygons = polygons.len(), "boundaries loaded");
        Ok(Self::from_polygons(polygons))
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn polygons(&self) -> &[BoundaryPolygon] {
        &self.polygons
    }

    /// Find the region containing `point`.
    ///
    /// Candidates whose bounding box holds the point are tested in dataset
    /// order and the first containing polygon wins.
    pub fn locate(&self, point: &Point<f64>) -> Option<RegionMatch<'_>> {
        let query = AABB::from_point([point.x(), point.y()]);
        let mut candidates: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query)
            .map(|envelope| envelope.index)
            .collect();
        candidates.sort_unstable();

        let mut containing = candidates
            .into_iter()
            .map(|index| &self.polygons[index])
            .filter(|polygon| polygon.contains(point));
        let region = containing.next()?;
        Some(RegionMatch {
            region,
            matches: 1 + containing.count(),
        })
    }
}
