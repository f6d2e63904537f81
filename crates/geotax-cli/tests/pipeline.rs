//! Integration tests for the pipeline module.

use std::io::Write;

use geo::{MultiPolygon, Rect, coord};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tempfile::{NamedTempFile, TempDir};

use geotax_cli::pipeline::{
    PipelineContext, StepOutcome, process_file, process_frame, run_step, write_output,
};
use geotax_geo::{ASSIGN_REGIONS, BUILD_POINTS, BoundaryIndex, BoundaryPolygon};
use geotax_model::schema::{NAME, STATE};
use geotax_model::{DiagnosticEvent, DomainProfile, RecordingDiagnostics, StepReport};
use geotax_transform::normalization::{
    DROP_MISSING_AND_DUPLICATES, MAP_CATEGORIES, MAP_MAIN_CATEGORY, SELECT_COLUMNS,
    SPLIT_COORDINATES, split_coordinates,
};
use geotax_transform::{DERIVE_ATTRIBUTE, FILTER_DOMAIN, TransformError};

const LISTINGS: &str = "\
name,website,main_category,categories,phone,address,coordinates,link
Quinta A,,Livestock farm,\"Farm, Dairy farm\",1,a,\"41.1,-8.6\",l1
Quinta B,b.pt,Dairy farm,Dairy farm,2,b,\"41.1,-8.6\",l2
Herdade C,None,Farm,\"Farm, Pig farm, Cattle farm\",3,c,\"38.5,-7.9\",l3
Viveiro D,,Fish farm,Fish farm,4,d,\"37.0,-8.0\",l4
Loja E,,Butcher shop,Butcher shop,5,e,\"40.2,-8.4\",l5
Mar F,,Fish farm,Fish farm,6,f,\"30.0,-20.0\",l6
";

fn region(state: &str, department: &str, min_lat: f64, max_lat: f64) -> BoundaryPolygon {
    let rect = Rect::new(
        coord! { x: -10.0, y: min_lat },
        coord! { x: -6.0, y: max_lat },
    );
    BoundaryPolygon::new(
        "Portugal",
        state,
        department,
        MultiPolygon::new(vec![rect.to_polygon()]),
    )
}

fn boundaries() -> BoundaryIndex {
    BoundaryIndex::from_polygons(vec![
        region("Norte", "Porto", 39.0, 42.0),
        region("Alentejo", "Beja", 36.0, 39.0),
    ])
}

fn listings_file() -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(LISTINGS.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn text(name: &str, values: &[&str]) -> Column {
    Series::new(name.into(), values.to_vec()).into()
}

fn strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_agriculture_file_end_to_end() {
    let profile = DomainProfile::builtin("agriculture").unwrap();
    let index = boundaries();
    let sink = RecordingDiagnostics::new();
    let ctx = PipelineContext {
        profile: &profile,
        boundaries: &index,
        diagnostics: &sink,
    };
    let input = listings_file();

    let processed = process_file(input.path(), ctx).unwrap();

    assert_eq!(processed.quality.rows, 6);
    assert_eq!(
        strings(&processed.data, NAME),
        vec!["Quinta A", "Herdade C", "Viveiro D"]
    );
    assert_eq!(
        strings(&processed.data, STATE),
        vec!["Norte", "Alentejo", "Alentejo"]
    );
    assert_eq!(
        strings(&processed.data, "animal_type"),
        vec!["cows", "other", "fish"]
    );
    assert!(
        processed
            .validation
            .null_columns()
            .contains(&("website".to_string(), 3))
    );
    assert!(sink.skipped_steps().is_empty());

    let steps: Vec<String> = sink
        .step_reports()
        .into_iter()
        .map(|report| report.step)
        .collect();
    assert_eq!(
        steps,
        vec![
            SELECT_COLUMNS,
            DROP_MISSING_AND_DUPLICATES,
            SPLIT_COORDINATES,
            MAP_MAIN_CATEGORY,
            MAP_CATEGORIES,
            FILTER_DOMAIN,
            DERIVE_ATTRIBUTE,
            BUILD_POINTS,
            ASSIGN_REGIONS,
        ]
    );
}

#[test]
fn test_input_profile_reports_duplicates_per_column() {
    let profile = DomainProfile::builtin("agriculture").unwrap();
    let index = boundaries();
    let sink = RecordingDiagnostics::new();
    let ctx = PipelineContext {
        profile: &profile,
        boundaries: &index,
        diagnostics: &sink,
    };
    let input = listings_file();

    process_file(input.path(), ctx).unwrap();

    let events = sink.events();
    let Some(DiagnosticEvent::InputProfile {
        rows,
        duplicates_by_column,
        ..
    }) = events.first()
    else {
        panic!("first event is not the input profile: {events:?}");
    };
    assert_eq!(*rows, 6);
    assert_eq!(duplicates_by_column.get("coordinates"), Some(&1));
    assert_eq!(duplicates_by_column.get("main_category"), Some(&1));
    assert_eq!(duplicates_by_column.get("name"), Some(&0));
}

#[test]
fn test_output_file_columns() {
    let profile = DomainProfile::builtin("agriculture").unwrap();
    let index = boundaries();
    let sink = RecordingDiagnostics::new();
    let ctx = PipelineContext {
        profile: &profile,
        boundaries: &index,
        diagnostics: &sink,
    };
    let input = listings_file();
    let output_dir = TempDir::new().unwrap();

    let processed = process_file(input.path(), ctx).unwrap();
    let path = write_output(&processed.data, &profile, input.path(), output_dir.path()).unwrap();

    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("_cleaned.csv")
    );
    let written = std::fs::read_to_string(&path).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some(
            "name,website,main_category,categories,phone,address,coordinates,link,\
             latitude,longitude,animal_type,country,state,department"
        )
    );
    assert_eq!(lines.count(), 3);
}

#[test]
fn test_profile_without_derived_attribute_skips_derive() {
    let mut profile = DomainProfile::builtin("agriculture").unwrap();
    profile.derived = None;
    let index = boundaries();
    let sink = RecordingDiagnostics::new();
    let ctx = PipelineContext {
        profile: &profile,
        boundaries: &index,
        diagnostics: &sink,
    };
    let df = DataFrame::new(vec![
        text("name", &["Quinta A"]),
        text("website", &["a.pt"]),
        text("main_category", &["Dairy farm"]),
        text("categories", &["Dairy farm"]),
        text("phone", &["1"]),
        text("address", &["a"]),
        text("coordinates", &["41.1,-8.6"]),
        text("link", &["l1"]),
    ])
    .unwrap();

    let processed = process_frame(df, ctx).unwrap();

    assert_eq!(processed.data.height(), 1);
    assert!(processed.data.column("animal_type").is_err());
    assert!(
        processed
            .steps
            .iter()
            .all(|outcome| outcome.step() != DERIVE_ATTRIBUTE)
    );
}

#[test]
fn test_recoverable_step_keeps_prior_table() {
    let df = DataFrame::new(vec![text("name", &["Quinta A", "Herdade C"])]).unwrap();
    let sink = RecordingDiagnostics::new();
    let mut outcomes = Vec::new();

    let out = run_step(
        SPLIT_COORDINATES,
        df.clone(),
        &sink,
        &mut outcomes,
        split_coordinates,
    )
    .unwrap();

    assert!(out.equals_missing(&df));
    assert_eq!(sink.skipped_steps(), vec![SPLIT_COORDINATES.to_string()]);
    assert!(matches!(
        outcomes.as_slice(),
        [StepOutcome::Skipped { step, .. }] if step == SPLIT_COORDINATES
    ));
}

#[test]
fn test_missing_columns_skip_steps_and_run_continues() {
    let profile = DomainProfile::builtin("agriculture").unwrap();
    let index = boundaries();
    let sink = RecordingDiagnostics::new();
    let ctx = PipelineContext {
        profile: &profile,
        boundaries: &index,
        diagnostics: &sink,
    };
    let df = DataFrame::new(vec![text("name", &["Quinta A"])]).unwrap();

    let processed = process_frame(df.clone(), ctx).unwrap();

    assert!(processed.data.equals_missing(&df));
    assert!(sink.step_reports().is_empty());
    assert!(sink.skipped_steps().contains(&SELECT_COLUMNS.to_string()));
    assert!(sink.skipped_steps().contains(&ASSIGN_REGIONS.to_string()));
}

#[test]
fn test_fatal_step_error_stops() {
    let df = DataFrame::new(vec![text("name", &["Quinta A"])]).unwrap();
    let sink = RecordingDiagnostics::new();
    let mut outcomes = Vec::new();

    let result = run_step("explode", df, &sink, &mut outcomes, |_| {
        Err::<(DataFrame, StepReport), _>(TransformError::DataFrame {
            message: "out of memory".to_string(),
        })
    });

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("step explode failed"));
    assert!(outcomes.is_empty());
    assert!(sink.events().is_empty());
}

#[test]
fn test_unreadable_input_fails_the_file() {
    let profile = DomainProfile::builtin("agriculture").unwrap();
    let index = boundaries();
    let sink = RecordingDiagnostics::new();
    let ctx = PipelineContext {
        profile: &profile,
        boundaries: &index,
        diagnostics: &sink,
    };

    let result = process_file(std::path::Path::new("/nonexistent/listings.csv"), ctx);

    assert!(result.is_err());
    assert!(sink.events().is_empty());
}
