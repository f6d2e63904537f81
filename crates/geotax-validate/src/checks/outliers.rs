//! Outlier detection on numeric columns.
//!
//! A value is an outlier when it lies at least two population standard
//! deviations from the column mean. Values exactly on the band edge count.

use geotax_ingest::any_to_f64;
use polars::prelude::{AnyValue, DataFrame};

use crate::finding::Finding;

const BAND_WIDTH: f64 = 2.0;

// Relative slack so values on the band edge survive rounding in the mean and variance.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Mean, population standard deviation and outlying values of `values`.
///
/// Returns `None` for fewer than two values or zero variance.
pub fn find_outliers(values: &[f64]) -> Option<(f64, f64, Vec<f64>)> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    if !std_dev.is_finite() || std_dev == 0.0 {
        return None;
    }

    let threshold = BAND_WIDTH * std_dev * (1.0 - EDGE_TOLERANCE);
    let outliers: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| (v - mean).abs() >= threshold)
        .collect();
    Some((mean, std_dev, outliers))
}

/// One finding per numeric column with at least one outlier.
pub fn check(df: &DataFrame) -> Vec<Finding> {
    let mut findings = Vec::new();
    for column in df.get_columns() {
        if !column.dtype().is_primitive_numeric() {
            continue;
        }
        let values: Vec<f64> = (0..column.len())
            .filter_map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
            .filter(|v| v.is_finite())
            .collect();
        let Some((mean, std_dev, outliers)) = find_outliers(&values) else {
            continue;
        };
        if outliers.is_empty() {
            continue;
        }
        findings.push(Finding::Outliers {
            column: column.name().to_string(),
            mean,
            std_dev,
            values: outliers,
        });
    }
    findings
}
