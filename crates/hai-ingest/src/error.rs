//! Error types for report ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering or reading report files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Workbook Errors ===
    /// Neither the extension-based nor the content-sniffing reader could open the workbook.
    #[error("failed to read workbook {path}: {primary}; fallback: {fallback}")]
    WorkbookRead {
        path: PathBuf,
        primary: String,
        fallback: String,
    },

    /// Workbook has no worksheets.
    #[error("workbook has no worksheets: {path}")]
    NoWorksheet { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
