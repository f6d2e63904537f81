//! Listing transformation steps.
//!
//! Each step borrows the table produced by the previous one and returns a
//! new table together with a [`StepReport`](geotax_model::StepReport):
//!
//! - **normalization**: column projection, missing values, deduplication,
//!   coordinate splitting and taxonomy mapping
//! - **filter**: domain filtering and primary-category reclassification
//! - **derive**: the profile's derived attribute
//! - **frame**: column access helpers and value counts
//!
//! Errors say whether the step can be skipped; see
//! [`TransformError::is_recoverable`].

pub mod derive;
pub mod error;
pub mod filter;
pub mod frame;
pub mod normalization;

pub use derive::{DERIVE_ATTRIBUTE, derive_attribute};
pub use error::{Result, TransformError};
pub use filter::{FILTER_DOMAIN, filter_domain, reclassify};
pub use frame::value_counts;
