//! Listing data model shared by every pipeline stage.
//!
//! This crate owns the configuration side of the pipeline and the small
//! value types that flow between stages:
//!
//! - **schema**: column names of the listing table and the category-list cell encoding
//! - **taxonomy**: raw label to canonical tag mapping
//! - **profile**: domain profiles (taxonomy + keyword sets + derived attribute + boundaries)
//! - **report**: per-step row accounting
//! - **diagnostics**: the structured event sink passed into the pipeline

pub mod diagnostics;
pub mod error;
pub mod profile;
pub mod report;
pub mod schema;
pub mod taxonomy;

pub use diagnostics::{DiagnosticEvent, Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use error::{ModelError, Result};
pub use profile::{BoundaryConfig, DerivedAttribute, DomainProfile, KeywordSets};
pub use report::StepReport;
pub use taxonomy::{LabelFallback, TaxonomyTable, slugify_label};
