use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Row accounting for one pipeline step.
///
/// Every step reports how many rows it received and returned, how many of
/// the surviving rows it rewrote, and named counters for the individual
/// reasons rows were removed or changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub rows_modified: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub counts: BTreeMap<String, usize>,
}

impl StepReport {
    pub fn new(step: impl Into<String>, rows_in: usize) -> Self {
        Self {
            step: step.into(),
            rows_in,
            rows_out: rows_in,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rows_out(mut self, rows_out: usize) -> Self {
        self.rows_out = rows_out;
        self
    }

    #[must_use]
    pub fn with_modified(mut self, rows_modified: usize) -> Self {
        self.rows_modified = rows_modified;
        self
    }

    #[must_use]
    pub fn with_count(mut self, key: impl Into<String>, value: usize) -> Self {
        self.counts.insert(key.into(), value);
        self
    }

    pub fn rows_removed(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }
}
