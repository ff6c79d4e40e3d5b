//! Batch processing with explicit stages.
//!
//! 1. **Discover**: list spreadsheets and classify them by report type
//! 2. **Extract**: read each file and pull its indicators, one file at a time
//! 3. **Assemble**: merge per-file values and order them for output
//! 4. **Write**: persist the summary once, unless this is a dry run

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, info_span, warn};

use hai_core::{CombinedResult, ExtractError, FileOutcome, SkipReason, extract_report};
use hai_ingest::{IngestError, classify_files, list_spreadsheet_files, load_raw_grid};
use hai_model::{IndicatorValue, ReportType};
use hai_output::{DEFAULT_OUTPUT_DIR_NAME, OutputError, OutputFormat, default_output_path, write_summary};
use hai_standards::Catalog;

/// What to process and where to put the result.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub input_dir: PathBuf,
    /// Directory for the timestamped summary; defaults to `<input_dir>/输出结果`.
    pub output_dir: Option<PathBuf>,
    /// Full output path; takes precedence over `output_dir`.
    pub output_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub dry_run: bool,
}

impl BatchRequest {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            output_path: None,
            format: OutputFormat::default(),
            dry_run: false,
        }
    }

    /// Resolves the summary path. Directory defaults are applied here, the
    /// timestamp is taken at call time.
    pub fn resolve_output_path(&self) -> PathBuf {
        if let Some(path) = &self.output_path {
            return path.clone();
        }
        let dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| self.input_dir.join(DEFAULT_OUTPUT_DIR_NAME));
        default_output_path(&dir, self.format)
    }
}

/// Fatal batch errors. Per-file problems never surface here.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Discovery(#[from] IngestError),

    #[error("no report files matched in {dir}")]
    NoMatchingFiles { dir: PathBuf },

    #[error("no indicator data extracted from {files} file(s)")]
    NoData { files: usize },

    #[error("batch cancelled")]
    Cancelled,

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// One row of the ordered summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub name: String,
    pub value: IndicatorValue,
}

impl From<(String, IndicatorValue)> for SummaryRow {
    fn from((name, value): (String, IndicatorValue)) -> Self {
        Self { name, value }
    }
}

/// Outcome of one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub report: ReportType,
    pub outcome: FileOutcome,
    pub extracted: usize,
}

impl FileReport {
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Written summary; `None` for dry runs.
    pub output: Option<PathBuf>,
    pub ordered: Vec<SummaryRow>,
    /// Extracted names with no place in the output order.
    pub unlisted: Vec<SummaryRow>,
    pub combined: CombinedResult,
    pub files: Vec<FileReport>,
}

impl BatchResult {
    pub fn skipped(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, FileOutcome::Skipped(_)))
    }
}

/// Runs the whole batch.
pub fn run_batch(request: &BatchRequest, catalog: &Catalog) -> Result<BatchResult, BatchError> {
    run_batch_with_cancel(request, catalog, &AtomicBool::new(false))
}

/// Runs the whole batch, checking `cancel` before each file and before writing.
pub fn run_batch_with_cancel(
    request: &BatchRequest,
    catalog: &Catalog,
    cancel: &AtomicBool,
) -> Result<BatchResult, BatchError> {
    let span = info_span!("batch", input = %request.input_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 1: Discover
    // =========================================================================
    let files = list_spreadsheet_files(&request.input_dir)?;
    let groups = classify_files(&files, catalog);
    if groups.is_empty() {
        error!(
            spreadsheets = files.len(),
            "no files matched any report pattern"
        );
        return Err(BatchError::NoMatchingFiles {
            dir: request.input_dir.clone(),
        });
    }
    let matched: usize = groups.iter().map(|group| group.files.len()).sum();
    info!(
        spreadsheets = files.len(),
        matched,
        report_types = groups.len(),
        "discovery complete"
    );

    // =========================================================================
    // Stage 2: Extract
    // =========================================================================
    let mut combined = CombinedResult::new();
    let mut reports = Vec::with_capacity(matched);
    for group in &groups {
        for path in &group.files {
            if cancel.load(Ordering::SeqCst) {
                return Err(BatchError::Cancelled);
            }
            let outcome = process_file(path, group.report, catalog)?;
            if let Some(values) = outcome.values() {
                combined.merge(values);
            }
            reports.push(FileReport {
                path: path.clone(),
                report: group.report,
                extracted: outcome.extracted_count(),
                outcome,
            });
        }
    }

    if combined.is_empty() {
        error!(files = reports.len(), "no indicator data extracted");
        return Err(BatchError::NoData {
            files: reports.len(),
        });
    }

    // =========================================================================
    // Stage 3: Assemble
    // =========================================================================
    let ordered: Vec<SummaryRow> = combined
        .ordered(&catalog.output_order)
        .into_iter()
        .map(SummaryRow::from)
        .collect();
    let unlisted: Vec<SummaryRow> = combined
        .unlisted(&catalog.output_order)
        .into_iter()
        .map(SummaryRow::from)
        .collect();
    if !unlisted.is_empty() {
        info!(
            names = %unlisted.iter().map(|row| row.name.as_str()).collect::<Vec<_>>().join(", "),
            "extracted indicators not in output order"
        );
    }

    // =========================================================================
    // Stage 4: Write
    // =========================================================================
    if cancel.load(Ordering::SeqCst) {
        return Err(BatchError::Cancelled);
    }
    let output = if request.dry_run {
        info!("dry run, summary not written");
        None
    } else {
        let path = request.resolve_output_path();
        write_summary(&path, &catalog.entity_label, &ordered_pairs(&ordered), request.format)?;
        Some(path)
    };

    info!(
        files = reports.len(),
        extracted = combined.len(),
        written = ordered.len(),
        duration_ms = start.elapsed().as_millis(),
        "batch complete"
    );

    Ok(BatchResult {
        output,
        ordered,
        unlisted,
        combined,
        files: reports,
    })
}

fn process_file(
    path: &Path,
    report: ReportType,
    catalog: &Catalog,
) -> Result<FileOutcome, ExtractError> {
    let span = info_span!("file", name = %file_name(path));
    let _guard = span.enter();
    info!(report = %report, "processing file");

    let grid = match load_raw_grid(path) {
        Ok(grid) => grid,
        Err(error) => {
            warn!(%error, "file could not be read, skipped");
            return Ok(FileOutcome::Skipped(SkipReason::ReadFailed {
                message: error.to_string(),
            }));
        }
    };
    extract_report(&grid, report, catalog)
}

fn ordered_pairs(rows: &[SummaryRow]) -> Vec<(String, IndicatorValue)> {
    rows.iter()
        .map(|row| (row.name.clone(), row.value.clone()))
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_output_path_wins() {
        let mut request = BatchRequest::new("/data/reports");
        request.output_dir = Some(PathBuf::from("/tmp/out"));
        request.output_path = Some(PathBuf::from("/tmp/summary.xlsx"));
        assert_eq!(request.resolve_output_path(), PathBuf::from("/tmp/summary.xlsx"));
    }

    #[test]
    fn output_dir_defaults_under_input() {
        let request = BatchRequest::new("/data/reports");
        let path = request.resolve_output_path();
        assert_eq!(path.parent(), Some(Path::new("/data/reports/输出结果")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("xlsx"));
    }

    #[test]
    fn csv_format_changes_extension() {
        let mut request = BatchRequest::new("/data/reports");
        request.output_dir = Some(PathBuf::from("/tmp/out"));
        request.format = OutputFormat::Csv;
        let path = request.resolve_output_path();
        assert_eq!(path.parent(), Some(Path::new("/tmp/out")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
    }
}
