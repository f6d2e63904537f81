use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use comfy_table::Table;
use tracing::{error, info, info_span};

use geotax_cli::pipeline::{PipelineContext, process_file, write_output};
use geotax_geo::BoundaryIndex;
use geotax_model::{DomainProfile, TracingDiagnostics};

use crate::cli::RunArgs;
use crate::summary::apply_table_style;
use crate::types::{FileSummary, RunResult};

pub fn run_profiles() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        "Profile",
        "Description",
        "Taxonomy",
        "Unmapped labels",
        "Narrow tags",
        "Derived column",
    ]);
    apply_table_style(&mut table);
    for name in DomainProfile::builtin_names() {
        let profile =
            DomainProfile::builtin(name).with_context(|| format!("load profile {name}"))?;
        table.add_row(profile_row(&profile));
    }
    println!("{table}");
    Ok(())
}

fn profile_row(profile: &DomainProfile) -> Vec<String> {
    vec![
        profile.name.clone(),
        profile.description.clone().unwrap_or_default(),
        profile.taxonomy.len().to_string(),
        profile.taxonomy.fallback().to_string(),
        profile.keywords.narrow.len().to_string(),
        profile
            .derived
            .as_ref()
            .map(|derived| derived.column.clone())
            .unwrap_or_else(|| "-".to_string()),
    ]
}

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let run_span = info_span!("run", profile = %args.profile, inputs = args.inputs.len());
    let _run_guard = run_span.enter();

    // =========================================================================
    // Stage 0: Profile and boundary index, shared by every input
    // =========================================================================
    let mut profile = DomainProfile::resolve(&args.profile)
        .with_context(|| format!("load profile {}", args.profile))?;
    if let Some(path) = &args.boundaries {
        profile = profile.with_boundaries_path(path);
    }
    let boundary_path = profile.boundaries.path.clone().ok_or_else(|| {
        anyhow!(
            "profile {} has no boundary dataset; pass --boundaries <PATH>",
            profile.name
        )
    })?;

    let load_start = Instant::now();
    let boundaries = BoundaryIndex::load(&boundary_path, &profile.boundaries)
        .with_context(|| format!("load boundaries {}", boundary_path.display()))?;
    info!(
        polygons = boundaries.len(),
        duration_ms = load_start.elapsed().as_millis(),
        "boundary index ready"
    );

    let diagnostics = TracingDiagnostics;
    let ctx = PipelineContext {
        profile: &profile,
        boundaries: &boundaries,
        diagnostics: &diagnostics,
    };

    // =========================================================================
    // Stage 1: One pass per input; a failing input does not stop the others
    // =========================================================================
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for input in &args.inputs {
        let processed = match process_file(input, ctx) {
            Ok(processed) => processed,
            Err(err) => {
                let message = format!("{err:#}");
                error!(source_file = %input.display(), error = %message, "input failed");
                errors.push(format!("{}: {message}", input.display()));
                continue;
            }
        };

        let output = if args.dry_run {
            None
        } else {
            let output_dir = match &args.output_dir {
                Some(dir) => dir.clone(),
                None => input
                    .parent()
                    .map(std::path::Path::to_path_buf)
                    .unwrap_or_default(),
            };
            match write_output(&processed.data, &profile, input, &output_dir) {
                Ok(path) => Some(path),
                Err(err) => {
                    let message = format!("{err:#}");
                    error!(source_file = %input.display(), error = %message, "output failed");
                    errors.push(format!("{}: {message}", input.display()));
                    None
                }
            }
        };

        files.push(FileSummary {
            source: processed.source,
            quality: processed.quality,
            steps: processed.steps,
            rows_out: processed.data.height(),
            validation: processed.validation,
            output,
        });
    }

    Ok(RunResult {
        profile: profile.name.clone(),
        boundary_polygons: boundaries.len(),
        files,
        has_errors: !errors.is_empty(),
        errors,
    })
}
