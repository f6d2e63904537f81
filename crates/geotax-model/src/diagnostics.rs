//! Structured diagnostics passed explicitly through the pipeline.
//!
//! Stages never touch process-wide logging state to report their results.
//! The runner hands a [`Diagnostics`] implementation to each run, so several
//! inputs can be processed concurrently with independent sinks.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::report::StepReport;
use crate::schema::CATEGORIES;

/// A structured event produced while processing one input.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// Quality profile of an input as it was read, before any step.
    InputProfile {
        rows: usize,
        columns: usize,
        missing_percent: f64,
        duplicate_percent: f64,
        /// Repeated non-missing values in each column.
        duplicates_by_column: BTreeMap<String, usize>,
    },
    /// A step ran to completion.
    StepCompleted(StepReport),
    /// A step hit a recoverable error; the table was left as it was.
    StepSkipped { step: String, reason: String },
    /// Value distribution of a column after a step.
    Distribution {
        step: String,
        column: String,
        counts: BTreeMap<String, usize>,
    },
    /// Columns holding at least one missing value, with their null counts.
    NullCoverage { columns: Vec<(String, usize)> },
    /// Values outside the outlier band of a numeric column.
    Outliers { column: String, values: Vec<f64> },
}

/// Sink for [`DiagnosticEvent`]s.
pub trait Diagnostics: Send + Sync {
    fn emit(&self, event: DiagnosticEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::InputProfile {
                rows,
                columns,
                missing_percent,
                duplicate_percent,
                duplicates_by_column,
            } => info!(
                rows,
                columns,
                missing_percent,
                duplicate_percent,
                duplicates_by_column = ?duplicates_by_column,
                "input profile"
            ),
            DiagnosticEvent::StepCompleted(report) => info!(
                step = %report.step,
                rows_in = report.rows_in,
                rows_out = report.rows_out,
                rows_removed = report.rows_removed(),
                rows_modified = report.rows_modified,
                counts = ?report.counts,
                "step complete"
            ),
            DiagnosticEvent::StepSkipped { step, reason } => {
                warn!(step = %step, reason = %reason, "step skipped, table left unchanged");
            }
            // Category lists have a long tail of distinct values.
            DiagnosticEvent::Distribution {
                step,
                column,
                counts,
            } if column == CATEGORIES => debug!(
                step = %step,
                column = %column,
                distinct = counts.len(),
                counts = %format_counts(&counts),
                "distribution"
            ),
            DiagnosticEvent::Distribution {
                step,
                column,
                counts,
            } => info!(
                step = %step,
                column = %column,
                distinct = counts.len(),
                counts = %format_counts(&counts),
                "distribution"
            ),
            DiagnosticEvent::NullCoverage { columns } => {
                if !columns.is_empty() {
                    let names: Vec<String> = columns
                        .iter()
                        .map(|(name, count)| format!("{name} ({count})"))
                        .collect();
                    info!(columns = %names.join(", "), "null values found");
                }
            }
            DiagnosticEvent::Outliers { column, values } => {
                info!(column = %column, count = values.len(), values = ?values, "outliers found");
            }
        }
    }
}

/// Render counts most-frequent first, the way a value-count listing reads.
fn format_counts(counts: &BTreeMap<String, usize>) -> String {
    let mut ordered: Vec<(&String, &usize)> = counts.iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    ordered
        .into_iter()
        .map(|(value, count)| format!("{value}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reports of the completed steps, in order.
    pub fn step_reports(&self) -> Vec<StepReport> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DiagnosticEvent::StepCompleted(report) => Some(report),
                _ => None,
            })
            .collect()
    }

    /// Names of the skipped steps, in order.
    pub fn skipped_steps(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DiagnosticEvent::StepSkipped { step, .. } => Some(step),
                _ => None,
            })
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn emit(&self, event: DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_render_most_frequent_first() {
        let counts = BTreeMap::from([
            ("cows".to_string(), 2),
            ("fish".to_string(), 5),
            ("other".to_string(), 2),
        ]);
        assert_eq!(format_counts(&counts), "fish=5, cows=2, other=2");
    }

    #[test]
    fn recording_keeps_order() {
        let sink = RecordingDiagnostics::new();
        sink.emit(DiagnosticEvent::StepCompleted(StepReport::new("a", 1)));
        sink.emit(DiagnosticEvent::StepSkipped {
            step: "b".to_string(),
            reason: "missing column".to_string(),
        });
        sink.emit(DiagnosticEvent::StepCompleted(StepReport::new("c", 1)));
        let steps: Vec<String> = sink.step_reports().into_iter().map(|r| r.step).collect();
        assert_eq!(steps, vec!["a", "c"]);
        assert_eq!(sink.skipped_steps(), vec!["b"]);
    }
}
