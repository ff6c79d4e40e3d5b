//! Data model shared by the indicator extraction crates.
//!
//! Raw grids come in from the workbook loader, normalized tables flow through
//! the core pipeline, and indicator maps come out the other end.

pub mod cell;
pub mod indicator;
pub mod report;
pub mod table;

pub use cell::{CellValue, RawGrid, format_numeric};
pub use indicator::{IndicatorMap, IndicatorValue};
pub use report::ReportType;
pub use table::NormalizedTable;
