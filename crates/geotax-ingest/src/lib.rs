//! Listing data ingestion.
//!
//! Loads scraped listing CSV files into Polars DataFrames and profiles
//! their quality before any transformation runs.
//!
//! # Features
//!
//! - **CSV Loading**: every column is read as text, so phone numbers and
//!   coordinate pairs are never coerced by type inference
//! - **Quality Profile**: missing-cell and duplicate-row percentages
//! - **Value Helpers**: `AnyValue` conversions shared by the later stages
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use geotax_ingest::{profile_frame, read_listing_csv};
//!
//! let df = read_listing_csv(Path::new("data/portugal.csv"))?;
//! let quality = profile_frame(&df);
//! println!("{:.1}% missing", quality.missing_percent);
//! ```

mod csv;
mod error;
mod quality;
mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{MAX_CSV_FILE_SIZE, check_file_size_with_limit, read_listing_csv, validate_encoding};

// === Quality Profile ===
pub use quality::{IngestQuality, profile_frame};

// === Value Helpers ===
pub use values::any_to_f64;
