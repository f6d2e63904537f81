use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use geotax_cli::pipeline::StepOutcome;
use geotax_model::StepReport;

use crate::types::{FileSummary, RunResult};

pub fn print_summary(result: &RunResult) {
    println!("Profile: {}", result.profile);
    println!("Boundary polygons: {}", result.boundary_polygons);
    for file in &result.files {
        print_step_table(file);
    }
    print_file_table(result);
    print_finding_table(result);
    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_step_table(file: &FileSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Rows In"),
        header_cell("Rows Out"),
        header_cell("Removed"),
        header_cell("Modified"),
        header_cell("Details"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for outcome in &file.steps {
        match outcome {
            StepOutcome::Completed(report) => table.add_row(vec![
                Cell::new(&report.step),
                Cell::new(report.rows_in),
                Cell::new(report.rows_out),
                count_cell(report.rows_removed(), Color::Yellow),
                count_cell(report.rows_modified, Color::Blue),
                Cell::new(details(report)),
            ]),
            StepOutcome::Skipped { step, reason } => table.add_row(vec![
                Cell::new(step).fg(Color::Yellow),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(format!("skipped: {reason}")).fg(Color::Yellow),
            ]),
        };
    }
    println!();
    println!("{}:", file_name(&file.source));
    println!("{table}");
}

fn print_file_table(result: &RunResult) {
    if result.files.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Rows In"),
        header_cell("Missing %"),
        header_cell("Duplicate %"),
        header_cell("Rows Out"),
        header_cell("Skipped"),
        header_cell("Findings"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);
    let mut total_in = 0usize;
    let mut total_out = 0usize;
    for file in &result.files {
        let skipped = file
            .steps
            .iter()
            .filter(|outcome| matches!(outcome, StepOutcome::Skipped { .. }))
            .count();
        total_in += file.quality.rows;
        total_out += file.rows_out;
        table.add_row(vec![
            Cell::new(file_name(&file.source))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(file.quality.rows),
            Cell::new(format!("{:.1}", file.quality.missing_percent)),
            Cell::new(format!("{:.1}", file.quality.duplicate_percent)),
            Cell::new(file.rows_out),
            count_cell(skipped, Color::Yellow),
            count_cell(file.validation.findings.len(), Color::Yellow),
            output_cell(file.output.as_deref()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_in).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_out).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!();
    println!("{table}");
}

fn print_finding_table(result: &RunResult) {
    if result.files.iter().all(|file| file.validation.is_empty()) {
        return;
    }
    let findings = result.files.iter().flat_map(|file| {
        file.validation
            .findings
            .iter()
            .map(move |finding| (file_name(&file.source), finding))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for (file, finding) in findings {
        table.add_row(vec![
            Cell::new(file),
            Cell::new(finding.column()),
            Cell::new(finding.kind()).fg(Color::Yellow),
            Cell::new(finding.message()),
        ]);
    }
    println!();
    println!("Findings:");
    println!("{table}");
}

/// Named counters of a step, zero counts left out.
fn details(report: &StepReport) -> String {
    let parts: Vec<String> = report
        .counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(key, count)| format!("{key}={count}"))
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn output_cell(path: Option<&Path>) -> Cell {
    match path {
        Some(_) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
