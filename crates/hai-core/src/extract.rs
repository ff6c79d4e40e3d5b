//! Single-report extraction.

use std::fmt;

use serde::Serialize;
use tracing::{info, info_span, warn};

use hai_model::{IndicatorMap, RawGrid, ReportType};
use hai_standards::Catalog;

use crate::error::{ExtractError, NormalizeError};
use crate::header::locate_header_row;
use crate::indicators::resolve_indicators;
use crate::normalize::{NormalizeOptions, normalize_grid};
use crate::totals::resolve_totals_row;

/// Why a file contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    ReadFailed { message: String },
    EmptyAfterCleaning,
    NoTotalsRow { entities: Vec<String> },
    NoIndicators { columns: Vec<String> },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { message } => write!(f, "read failed: {message}"),
            Self::EmptyAfterCleaning => f.write_str("no data after cleaning"),
            Self::NoTotalsRow { entities } => {
                write!(f, "no totals row among [{}]", entities.join(", "))
            }
            Self::NoIndicators { columns } => {
                write!(f, "no indicator columns among [{}]", columns.join(", "))
            }
        }
    }
}

/// Result of running one file through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum FileOutcome {
    Extracted(IndicatorMap),
    Skipped(SkipReason),
}

impl FileOutcome {
    /// Number of canonical entries this file produced.
    pub fn extracted_count(&self) -> usize {
        match self {
            Self::Extracted(values) => values.len(),
            Self::Skipped(_) => 0,
        }
    }

    pub fn values(&self) -> Option<&IndicatorMap> {
        match self {
            Self::Extracted(values) => Some(values),
            Self::Skipped(_) => None,
        }
    }
}

/// Extracts indicator values from one report grid.
///
/// Returns an error only when `kind` has no catalog entry. Every data problem
/// is a [`FileOutcome::Skipped`].
pub fn extract_report(
    grid: &RawGrid,
    kind: ReportType,
    catalog: &Catalog,
) -> Result<FileOutcome, ExtractError> {
    let profile = catalog
        .profile(kind)
        .ok_or(ExtractError::UnknownReportType { kind })?;
    let span = info_span!("extract", report = %kind);
    let _guard = span.enter();

    // =========================================================================
    // Header + normalization
    // =========================================================================
    let header = locate_header_row(grid, &profile.fragments());
    let options = NormalizeOptions {
        entity_markers: &catalog.entity_markers,
        relabel: profile.relabel.as_ref(),
    };
    let table = match normalize_grid(grid, header, options) {
        Ok(table) => table,
        Err(NormalizeError::EmptyAfterCleaning) => {
            warn!(header_row = header, "table is empty after cleaning, file skipped");
            return Ok(FileOutcome::Skipped(SkipReason::EmptyAfterCleaning));
        }
    };
    info!(
        rows = table.height(),
        columns = table.width(),
        entity_column = %table.headers[0],
        "table normalized"
    );

    // =========================================================================
    // Totals row
    // =========================================================================
    let Some(totals) = resolve_totals_row(&table, &catalog.totals_patterns) else {
        let entities = table.distinct_entities();
        warn!(entities = %entities.join(", "), "no totals row found, file skipped");
        return Ok(FileOutcome::Skipped(SkipReason::NoTotalsRow { entities }));
    };

    // =========================================================================
    // Indicators
    // =========================================================================
    let resolution = resolve_indicators(&table, totals.row, &profile.indicators);
    if resolution.is_empty() {
        warn!(columns = %table.headers.join(", "), "no indicator values extracted");
        return Ok(FileOutcome::Skipped(SkipReason::NoIndicators {
            columns: table.headers.clone(),
        }));
    }
    info!(count = resolution.values.len(), "indicators extracted");
    Ok(FileOutcome::Extracted(resolution.values))
}
