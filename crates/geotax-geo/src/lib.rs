//! Geometry and region assignment.
//!
//! Turns the coordinate columns into points and labels each listing with
//! the administrative region whose polygon contains it.
//!
//! - **boundary**: [`BoundaryIndex`], an R-tree over boundary polygons
//! - **geojson**: FeatureCollection loading
//! - **points**: [`build_points`], the coordinate columns as `Float64`
//! - **regions**: [`assign_regions`], the containment join
//!
//! # Example
//!
//! ```ignore
//! use geotax_geo::{BoundaryIndex, assign_regions, build_points};
//!
//! let index = BoundaryIndex::load(Path::new("gadm_level2.geojson"), &profile.boundaries)?;
//! let (df, _) = build_points(&df)?;
//! let (df, report) = assign_regions(&df, &index)?;
//! ```

mod boundary;
mod error;
mod geojson;
mod points;
mod regions;

pub use boundary::{BoundaryIndex, BoundaryPolygon, RegionMatch};
pub use error::{GeoError, Result};
pub use geojson::{parse_boundaries, read_boundaries};
pub use points::{BUILD_POINTS, build_points, listing_point};
pub use regions::{ASSIGN_REGIONS, assign_regions};
