//! Report ingestion utilities.
//!
//! This crate finds surveillance report workbooks in a folder, classifies them
//! by report type using the catalog's file-name patterns, and loads the first
//! worksheet of each as a headerless [`RawGrid`](hai_model::RawGrid).
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use hai_ingest::{classify_files, list_spreadsheet_files, load_raw_grid};
//!
//! let catalog = hai_standards::load_default_catalog()?;
//! let files = list_spreadsheet_files(Path::new("reports"))?;
//! for group in classify_files(&files, &catalog) {
//!     for path in &group.files {
//!         let grid = load_raw_grid(path)?;
//!     }
//! }
//! ```

mod discovery;
mod error;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{ClassifiedFiles, classify_files, list_spreadsheet_files};

// === Workbook Reading ===
pub use workbook::{convert_cell, load_raw_grid};
