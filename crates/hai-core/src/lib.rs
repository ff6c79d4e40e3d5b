//! Indicator extraction core.
//!
//! The pipeline for a single report is:
//!
//! 1. [`locate_header_row`]: find the row that names the indicator columns
//! 2. [`normalize_grid`]: apply that header, drop blank rows/columns, and put
//!    the entity (department) column first
//! 3. [`resolve_totals_row`]: pick the hospital-wide row
//! 4. [`resolve_indicators`]: read indicator values from that row and record
//!    them under canonical names
//!
//! [`extract_report`] chains the four steps and reports why a file was skipped
//! when one of them comes up empty. [`CombinedResult`] merges the per-file maps
//! and orders the final summary.
//!
//! All matching is substring containment. Configuration order is the
//! tie-break everywhere: the first fragment, pattern, or marker that matches wins.

mod assemble;
mod error;
mod extract;
mod header;
mod indicators;
mod normalize;
mod totals;

pub use assemble::CombinedResult;
pub use error::{ExtractError, NormalizeError};
pub use extract::{FileOutcome, SkipReason, extract_report};
pub use header::{HeaderMatch, find_header_row, locate_header_row, row_probe};
pub use indicators::{IndicatorMatch, Resolution, resolve_indicators};
pub use normalize::{NormalizeOptions, normalize_grid};
pub use totals::{TotalsMatch, resolve_totals_row};
