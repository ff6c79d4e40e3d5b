use hai_model::ReportType;
use thiserror::Error;

/// Grid normalization failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("table is empty after removing blank rows and columns")]
    EmptyAfterCleaning,
}

/// Extraction setup failure.
///
/// Per-file "no data" results are not errors; see [`crate::SkipReason`].
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("report type {kind} is not configured in the catalog")]
    UnknownReportType { kind: ReportType },
}
