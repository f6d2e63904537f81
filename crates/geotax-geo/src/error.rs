//! Error types for boundary loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a boundary dataset.
///
/// Boundaries are loaded once per run, so any of these is fatal for the run.
#[derive(Debug, Error)]
pub enum GeoError {
    // === File System Errors ===
    /// Boundary file not found.
    #[error("boundary file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read boundary file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === GeoJSON Errors ===
    /// File is not valid GeoJSON.
    #[error("failed to parse GeoJSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Top-level object is not a FeatureCollection.
    #[error("{path} is a {found}, expected a FeatureCollection")]
    NotFeatureCollection { path: PathBuf, found: String },

    /// A feature lacks one of the configured label properties.
    #[error("feature {feature} in {path} has no '{property}' property")]
    MissingProperty {
        path: PathBuf,
        feature: usize,
        property: String,
    },

    /// A feature's coordinates do not form a polygon.
    #[error("feature {feature} in {path} has invalid geometry: {message}")]
    InvalidGeometry {
        path: PathBuf,
        feature: usize,
        message: String,
    },

    /// No polygon features were found.
    #[error("no polygon features in {path}")]
    NoPolygons { path: PathBuf },
}

impl GeoError {
    pub(crate) fn open(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for boundary operations.
pub type Result<T> = std::result::Result<T, GeoError>;
