//! Validation checks on small final tables.

use geotax_model::{DiagnosticEvent, RecordingDiagnostics};
use geotax_validate::{Finding, run_all};
use polars::prelude::{DataFrame, NamedFrom, Series};

#[test]
fn reports_outlier_in_numeric_column() {
    let df = DataFrame::new(vec![
        Series::new("reviews".into(), vec![1i64, 1, 1, 1, 100]).into(),
        Series::new("name".into(), vec!["a", "b", "c", "d", "e"]).into(),
    ])
    .unwrap();

    let report = run_all(&df);

    assert_eq!(report.outliers_for("reviews"), &[100.0]);
    assert!(report.null_columns().is_empty());
}

#[test]
fn constant_column_has_no_outliers() {
    let df = DataFrame::new(vec![Series::new("rating".into(), vec![5.0, 5.0, 5.0]).into()]).unwrap();

    let report = run_all(&df);

    assert!(report.is_empty());
}

#[test]
fn reports_null_columns_in_order() {
    let df = DataFrame::new(vec![
        Series::new("website".into(), vec![None, Some("b.pt"), None]).into(),
        Series::new("name".into(), vec!["a", "b", "c"]).into(),
        Series::new("phone".into(), vec![Some("1"), None, Some("3")]).into(),
    ])
    .unwrap();

    let report = run_all(&df);

    assert_eq!(
        report.null_columns(),
        vec![("website".to_string(), 2), ("phone".to_string(), 1)]
    );
    assert!(
        report
            .findings
            .iter()
            .all(|finding| matches!(finding, Finding::NullValues { .. }))
    );
}

#[test]
fn validation_never_changes_the_table() {
    let df = DataFrame::new(vec![
        Series::new("latitude".into(), vec![41.1, 41.2, 41.1, 41.3, 80.0]).into(),
    ])
    .unwrap();
    let before = df.clone();

    let _ = run_all(&df);

    assert!(df.equals_missing(&before));
}

#[test]
fn emits_diagnostic_events() {
    let df = DataFrame::new(vec![
        Series::new("reviews".into(), vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(100.0), None])
            .into(),
    ])
    .unwrap();
    let sink = RecordingDiagnostics::new();

    run_all(&df).emit(&sink);

    let events = sink.events();
    assert_eq!(
        events,
        vec![
            DiagnosticEvent::NullCoverage {
                columns: vec![("reviews".to_string(), 1)],
            },
            DiagnosticEvent::Outliers {
                column: "reviews".to_string(),
                values: vec![100.0],
            },
        ]
    );
}
