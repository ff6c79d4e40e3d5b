//! CLI argument definitions for the infection indicator summary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use hai_output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "hai-summary",
    version,
    about = "Summarize hospital infection surveillance indicators",
    long_about = "Read a folder of hospital infection surveillance reports (.xls/.xlsx),\n\
                  locate each report's hospital-wide row and collect its indicators\n\
                  into a single summary workbook."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

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

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract indicators from a folder of reports and write the summary.
    Extract(ExtractArgs),

    /// List report types, indicator fragments and canonical names.
    Catalog(CatalogArgs),
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// Folder containing the report spreadsheets.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for the summary (default: <INPUT_DIR>/输出结果).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Full path of the summary file (overrides --output-dir).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Summary file format.
    #[arg(long = "format", value_enum, default_value = "xlsx")]
    pub format: FormatArg,

    /// Indicator catalog to use instead of the built-in one.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extract and report without writing the summary.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the result as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    /// Run on a background worker and show a spinner with live log lines.
    #[arg(long = "progress")]
    pub progress: bool,
}

#[derive(Parser)]
pub struct CatalogArgs {
    /// Indicator catalog to list instead of the built-in one.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
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
