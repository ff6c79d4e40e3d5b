#![deny(unsafe_code)]

//! On-disk catalog layout, as deserialized from TOML.

use serde::{Deserialize, Serialize};

use hai_model::ReportType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub schema: String,
    pub schema_version: u32,
    pub entity_label: String,
    pub exclude_prefix: String,
    pub entity_markers: Vec<String>,
    pub totals_patterns: Vec<String>,
    #[serde(default)]
    pub output_order: Vec<String>,
    pub reports: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub kind: ReportType,
    #[serde(default)]
    pub label: Option<String>,
    pub file_pattern: String,
    #[serde(default)]
    pub relabel: Option<RelabelEntry>,
    pub indicators: Vec<IndicatorEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelabelEntry {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorEntry {
    pub fragment: String,
    #[serde(default)]
    pub canonical: Vec<String>,
}
