use std::path::PathBuf;

use geotax_ingest::IngestQuality;
use geotax_validate::ValidationReport;

use geotax_cli::pipeline::StepOutcome;

#[derive(Debug)]
pub struct RunResult {
    pub profile: String,
    pub boundary_polygons: usize,
    pub files: Vec<FileSummary>,
    pub errors: Vec<String>,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct FileSummary {
    pub source: PathBuf,
    pub quality: IngestQuality,
    pub steps: Vec<StepOutcome>,
    pub rows_out: usize,
    pub validation: ValidationReport,
    pub output: Option<PathBuf>,
}
