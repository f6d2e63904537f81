//! Validation report.

use geotax_model::{DiagnosticEvent, Diagnostics};
use serde::Serialize;

use crate::finding::Finding;

/// Findings of one validation run, in check order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Columns with null values and their null counts.
    pub fn null_columns(&self) -> Vec<(String, usize)> {
        self.findings
            .iter()
            .filter_map(|finding| match finding {
                Finding::NullValues { column, null_count } => Some((column.clone(), *null_count)),
                Finding::Outliers { .. } => None,
            })
            .collect()
    }

    /// Outlying values of `column`, empty when there are none.
    pub fn outliers_for(&self, column: &str) -> &[f64] {
        self.findings
            .iter()
            .find_map(|finding| match finding {
                Finding::Outliers { column: name, values, .. } if name == column => {
                    Some(values.as_slice())
                }
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Forward the findings as diagnostic events.
    pub fn emit(&self, diagnostics: &dyn Diagnostics) {
        diagnostics.emit(DiagnosticEvent::NullCoverage {
            columns: self.null_columns(),
        });
        for finding in &self.findings {
            if let Finding::Outliers { column, values, .. } = finding {
                diagnostics.emit(DiagnosticEvent::Outliers {
                    column: column.clone(),
                    values: values.clone(),
                });
            }
        }
    }
}
