//! Validation finding types.
//!
//! Findings are informational: they are reported, never acted upon.

use serde::Serialize;

/// Validation finding - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Finding {
    /// Column holds null values
    NullValues { column: String, null_count: usize },
    /// Numeric column has values at or beyond two standard deviations from its mean
    Outliers {
        column: String,
        mean: f64,
        std_dev: f64,
        values: Vec<f64>,
    },
}

impl Finding {
    pub fn column(&self) -> &str {
        match self {
            Self::NullValues { column, .. } | Self::Outliers { column, .. } => column,
        }
    }

    /// Short machine-friendly kind, used in summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NullValues { .. } => "null_values",
            Self::Outliers { .. } => "outliers",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NullValues { column, null_count } => {
                format!("{column} has {null_count} null value(s)")
            }
            Self::Outliers {
                column,
                mean,
                std_dev,
                values,
            } => format!(
                "{column} has {} value(s) outside {mean:.4} ± 2 × {std_dev:.4}",
                values.len()
            ),
        }
    }
}
