//! Error types for transformation steps.

use thiserror::Error;

/// Errors raised by a single transformation step.
///
/// The runner distinguishes two classes. A step whose input does not have
/// the expected shape (absent column, wrong dtype) is skipped and the table
/// it received is kept. Everything else aborts the input being processed.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column the step reads is not present.
    #[error("{step}: column '{column}' not found")]
    MissingColumn { step: &'static str, column: String },

    /// A column the step reads has a dtype it cannot handle.
    #[error("{step}: column '{column}' has type {dtype}, expected {expected}")]
    UnexpectedType {
        step: &'static str,
        column: String,
        dtype: String,
        expected: &'static str,
    },

    /// Polars failed while computing a step.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl TransformError {
    /// True when the step can be skipped without corrupting the table.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. } | Self::UnexpectedType { .. }
        )
    }
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transformation steps.
pub type Result<T> = std::result::Result<T, TransformError>;
