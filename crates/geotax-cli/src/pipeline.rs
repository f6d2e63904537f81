//! Listing pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Read the listing CSV and profile its quality
//! 2. **Normalize**: Project columns, drop missing and duplicate coordinates,
//!    split coordinates, map categories through the taxonomy
//! 3. **Filter**: Keep the target domain and reclassify primary categories
//! 4. **Derive**: Add the profile's derived attribute, if it has one
//! 5. **Regions**: Build points and join them against the boundary index
//! 6. **Validate**: Report null coverage and numeric outliers
//! 7. **Output**: Write `<stem>_cleaned.csv`
//!
//! Steps run under a log-and-continue policy: a step that fails with a
//! recoverable error (missing column, wrong column type) is skipped and the
//! table it received is passed on unchanged. Any other error stops the file.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::{debug, info, info_span};

use geotax_geo::{ASSIGN_REGIONS, BUILD_POINTS, BoundaryIndex, assign_regions, build_points};
use geotax_ingest::{IngestQuality, profile_frame, read_listing_csv};
use geotax_model::schema::{CATEGORIES, DEPARTMENT, MAIN_CATEGORY, STATE};
use geotax_model::{DiagnosticEvent, Diagnostics, DomainProfile, StepReport};
use geotax_transform::normalization::{
    DROP_MISSING_AND_DUPLICATES, MAP_CATEGORIES, MAP_MAIN_CATEGORY, SELECT_COLUMNS,
    SPLIT_COORDINATES, drop_missing_and_duplicates, map_categories, map_main_category,
    select_columns, split_coordinates,
};
use geotax_transform::{
    DERIVE_ATTRIBUTE, FILTER_DOMAIN, derive_attribute, filter_domain, value_counts,
};
use geotax_validate::{ValidationReport, run_all};

/// Suffix appended to the input file stem for the cleaned output.
pub const OUTPUT_SUFFIX: &str = "_cleaned";

/// What happened to one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Completed(StepReport),
    Skipped { step: String, reason: String },
}

impl StepOutcome {
    pub fn step(&self) -> &str {
        match self {
            Self::Completed(report) => &report.step,
            Self::Skipped { step, .. } => step,
        }
    }
}

/// Shared, read-only inputs of a run.
#[derive(Clone, Copy)]
pub struct PipelineContext<'a> {
    pub profile: &'a DomainProfile,
    pub boundaries: &'a BoundaryIndex,
    pub diagnostics: &'a dyn Diagnostics,
}

/// Result of running every transformation step over one table.
#[derive(Debug)]
pub struct ProcessedFrame {
    pub data: DataFrame,
    pub steps: Vec<StepOutcome>,
}

/// Result of processing one input file.
#[derive(Debug)]
pub struct ProcessedFile {
    pub source: PathBuf,
    pub quality: IngestQuality,
    pub data: DataFrame,
    pub steps: Vec<StepOutcome>,
    pub validation: ValidationReport,
}

/// Run one step under the log-and-continue policy.
///
/// On success the step report is emitted and the new table returned. A
/// recoverable error emits [`DiagnosticEvent::StepSkipped`] and returns the
/// input table. Other errors are returned with the step name attached.
pub fn run_step<F>(
    step: &'static str,
    df: DataFrame,
    diagnostics: &dyn Diagnostics,
    outcomes: &mut Vec<StepOutcome>,
    apply: F,
) -> Result<DataFrame>
where
    F: FnOnce(&DataFrame) -> geotax_transform::Result<(DataFrame, StepReport)>,
{
    let _guard = info_span!("step", step).entered();
    let start = Instant::now();
    match apply(&df) {
        Ok((next, report)) => {
            debug!(
                step,
                rows_out = next.height(),
                duration_ms = start.elapsed().as_millis(),
                "step finished"
            );
            diagnostics.emit(DiagnosticEvent::StepCompleted(report.clone()));
            outcomes.push(StepOutcome::Completed(report));
            Ok(next)
        }
        Err(error) if error.is_recoverable() => {
            let reason = error.to_string();
            diagnostics.emit(DiagnosticEvent::StepSkipped {
                step: step.to_string(),
                reason: reason.clone(),
            });
            outcomes.push(StepOutcome::Skipped {
                step: step.to_string(),
                reason,
            });
            Ok(df)
        }
        Err(error) => Err(error).with_context(|| format!("step {step} failed")),
    }
}

/// Emit the value distribution of `column`, if the table has it as text.
fn emit_distribution(df: &DataFrame, step: &str, column: &str, diagnostics: &dyn Diagnostics) {
    match value_counts(df, column) {
        Ok(counts) => diagnostics.emit(DiagnosticEvent::Distribution {
            step: step.to_string(),
            column: column.to_string(),
            counts,
        }),
        Err(error) => debug!(step, column, %error, "distribution unavailable"),
    }
}

/// Run the normalization, filter, derive and region steps over `df`.
pub fn process_frame(df: DataFrame, ctx: PipelineContext<'_>) -> Result<ProcessedFrame> {
    let PipelineContext {
        profile,
        boundaries,
        diagnostics,
    } = ctx;
    let mut steps = Vec::new();

    // ========================================================================
    // Normalize
    // ========================================================================
    let df = run_step(SELECT_COLUMNS, df, diagnostics, &mut steps, select_columns)?;
    let df = run_step(
        DROP_MISSING_AND_DUPLICATES,
        df,
        diagnostics,
        &mut steps,
        drop_missing_and_duplicates,
    )?;
    let df = run_step(SPLIT_COORDINATES, df, diagnostics, &mut steps, split_coordinates)?;
    let df = run_step(MAP_MAIN_CATEGORY, df, diagnostics, &mut steps, |df| {
        map_main_category(df, &profile.taxonomy)
    })?;
    let df = run_step(MAP_CATEGORIES, df, diagnostics, &mut steps, |df| {
        map_categories(df, &profile.taxonomy)
    })?;
    emit_distribution(&df, MAP_CATEGORIES, CATEGORIES, diagnostics);

    // ========================================================================
    // Filter and derive
    // ========================================================================
    let df = run_step(FILTER_DOMAIN, df, diagnostics, &mut steps, |df| {
        filter_domain(df, &profile.keywords)
    })?;
    emit_distribution(&df, FILTER_DOMAIN, MAIN_CATEGORY, diagnostics);

    let df = match &profile.derived {
        Some(attribute) => {
            let df = run_step(DERIVE_ATTRIBUTE, df, diagnostics, &mut steps, |df| {
                derive_attribute(df, attribute)
            })?;
            emit_distribution(&df, DERIVE_ATTRIBUTE, &attribute.column, diagnostics);
            df
        }
        None => {
            debug!(profile = %profile.name, "profile has no derived attribute");
            df
        }
    };

    // ========================================================================
    // Regions
    // ========================================================================
    let df = run_step(BUILD_POINTS, df, diagnostics, &mut steps, build_points)?;
    let df = run_step(ASSIGN_REGIONS, df, diagnostics, &mut steps, |df| {
        assign_regions(df, boundaries)
    })?;
    emit_distribution(&df, ASSIGN_REGIONS, STATE, diagnostics);
    emit_distribution(&df, ASSIGN_REGIONS, DEPARTMENT, diagnostics);

    Ok(ProcessedFrame { data: df, steps })
}

/// Read, transform and validate one listing file.
///
/// Ingestion errors are fatal for the file and returned as-is.
pub fn process_file(path: &Path, ctx: PipelineContext<'_>) -> Result<ProcessedFile> {
    let source = path.display().to_string();
    let process_span = info_span!("process_file", source_file = %source, profile = %ctx.profile.name);
    let _process_guard = process_span.enter();
    let process_start = Instant::now();

    let (raw, quality) = info_span!("ingest").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let raw = read_listing_csv(path).with_context(|| format!("read {source}"))?;
        let quality = profile_frame(&raw);
        ctx.diagnostics.emit(DiagnosticEvent::InputProfile {
            rows: quality.rows,
            columns: quality.columns,
            missing_percent: quality.missing_percent,
            duplicate_percent: quality.duplicate_percent,
            duplicates_by_column: quality.duplicates_by_column.clone(),
        });
        debug!(duration_ms = start.elapsed().as_millis(), "ingest complete");
        Ok((raw, quality))
    })?;

    let ProcessedFrame { data, steps } = process_frame(raw, ctx)?;

    let validation = info_span!("validate").in_scope(|| {
        let start = Instant::now();
        let validation = run_all(&data);
        validation.emit(ctx.diagnostics);
        debug!(
            findings = validation.findings.len(),
            duration_ms = start.elapsed().as_millis(),
            "validation complete"
        );
        validation
    });

    info!(
        rows_in = quality.rows,
        rows_out = data.height(),
        duration_ms = process_start.elapsed().as_millis(),
        "file processed"
    );

    Ok(ProcessedFile {
        source: path.to_path_buf(),
        quality,
        data,
        steps,
        validation,
    })
}

/// Output path for `source` inside `output_dir`.
pub fn output_path(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "listings".to_string());
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}.csv"))
}

/// Write the profile's output columns that are present in `df` as CSV.
pub fn write_output(
    df: &DataFrame,
    profile: &DomainProfile,
    source: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let output_span = info_span!("output", output_dir = %output_dir.display());
    let _output_guard = output_span.enter();
    let start = Instant::now();

    let columns: Vec<String> = profile
        .output_columns()
        .into_iter()
        .filter(|column| df.column(column).is_ok())
        .collect();
    let mut selected = df.select(columns).context("select output columns")?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let path = output_path(source, output_dir);
    let mut file =
        File::create(&path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut selected)
        .with_context(|| format!("write {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = selected.height(),
        columns = selected.width(),
        duration_ms = start.elapsed().as_millis(),
        "output written"
    );
    Ok(path)
}
