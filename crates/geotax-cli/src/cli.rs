//! CLI argument definitions for the listing pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "geotax",
    version,
    about = "Normalize scraped business listings and assign administrative regions",
    long_about = "Normalize scraped business listings into a domain taxonomy.\n\n\
                  Maps raw category labels to canonical tags, keeps the listings of one\n\
                  target domain, derives profile attributes and labels every listing with\n\
                  the country, state and department whose boundary contains it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Also write logs to this file.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline over one or more listing CSV files.
    Run(RunArgs),

    /// List the built-in domain profiles.
    Profiles,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Listing CSV files to process.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Built-in profile name or path to a profile TOML file.
    #[arg(long = "profile", short = 'p', value_name = "NAME|PATH")]
    pub profile: String,

    /// GeoJSON boundary dataset (overrides the profile's boundary path).
    #[arg(long = "boundaries", short = 'b', value_name = "PATH")]
    pub boundaries: Option<PathBuf>,

    /// Output directory for cleaned files (default: next to each input).
    #[arg(long = "output-dir", short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run every step and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
