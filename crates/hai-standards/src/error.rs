#![deny(unsafe_code)]

use std::path::PathBuf;

use hai_model::ReportType;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML catalog {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported catalog schema {schema} (version {version})")]
    UnsupportedSchema { schema: String, version: u32 },

    #[error("invalid file pattern for {kind}: {source}")]
    InvalidPattern {
        kind: ReportType,
        #[source]
        source: regex::Error,
    },

    #[error("report type listed more than once: {kind}")]
    DuplicateReport { kind: ReportType },

    #[error("report type {kind} has no indicators")]
    NoIndicators { kind: ReportType },

    #[error("report type {kind} has an empty indicator fragment")]
    EmptyFragment { kind: ReportType },

    #[error("catalog field {field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("duplicate name in output_order: {name}")]
    DuplicateOutputName { name: String },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
