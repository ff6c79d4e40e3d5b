#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::Path;

use regex::{Regex, RegexBuilder};

use hai_model::ReportType;

use crate::embedded::DEFAULT_CATALOG;
use crate::error::CatalogError;
use crate::manifest::{CatalogFile, IndicatorEntry, ReportEntry};

const CATALOG_SCHEMA: &str = "hai-summary.indicator-catalog";
const CATALOG_SCHEMA_VERSION: u32 = 1;

/// Source-side indicator: a label fragment and the canonical names it fans out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSpec {
    pub fragment: String,
    pub canonical: Vec<String>,
}

impl IndicatorSpec {
    pub fn new(fragment: impl Into<String>, canonical: Vec<String>) -> Self {
        Self {
            fragment: fragment.into(),
            canonical,
        }
    }

    /// Names a matched value is recorded under.
    ///
    /// Falls back to the fragment itself when no canonical mapping exists.
    pub fn output_names(&self) -> Vec<&str> {
        if self.canonical.is_empty() {
            vec![self.fragment.as_str()]
        } else {
            self.canonical.iter().map(String::as_str).collect()
        }
    }

    /// Positions of this indicator's output names within `output_order`.
    pub fn output_positions(&self, output_order: &[String]) -> Vec<usize> {
        let names = self.output_names();
        output_order
            .iter()
            .enumerate()
            .filter(|(_, name)| names.contains(&name.as_str()))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Column relabeling applied before cleaning, to keep canonical names apart
/// when two report types share a column label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelabelRule {
    pub from: String,
    pub to: String,
}

impl RelabelRule {
    /// Rewrites `label` if it contains the ambiguous fragment.
    pub fn apply(&self, label: &str) -> Option<String> {
        if label.contains(self.from.as_str()) {
            Some(label.replace(self.from.as_str(), &self.to))
        } else {
            None
        }
    }
}

/// Everything the pipeline needs to know about one report type.
#[derive(Debug, Clone)]
pub struct ReportProfile {
    pub kind: ReportType,
    pub label: String,
    pub file_pattern: Regex,
    pub relabel: Option<RelabelRule>,
    pub indicators: Vec<IndicatorSpec>,
}

impl ReportProfile {
    /// Indicator fragments in configured order; also used to find the header row.
    pub fn fragments(&self) -> Vec<&str> {
        self.indicators
            .iter()
            .map(|spec| spec.fragment.as_str())
            .collect()
    }

    /// Returns true if a file name belongs to this report type.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        self.file_pattern.is_match(file_name)
    }
}

/// Validated indicator catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Column header of the persisted summary.
    pub entity_label: String,
    /// Files whose name starts with this prefix are never read as input.
    pub exclude_prefix: String,
    /// Fragments identifying the department / entity column.
    pub entity_markers: Vec<String>,
    /// Ordered patterns identifying the hospital-wide row.
    pub totals_patterns: Vec<String>,
    /// Display order of canonical names in the final summary.
    pub output_order: Vec<String>,
    pub reports: Vec<ReportProfile>,
}

impl Catalog {
    pub fn profile(&self, kind: ReportType) -> Option<&ReportProfile> {
        self.reports.iter().find(|profile| profile.kind == kind)
    }

    pub fn output_position(&self, name: &str) -> Option<usize> {
        self.output_order.iter().position(|entry| entry == name)
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        if file.schema != CATALOG_SCHEMA || file.schema_version != CATALOG_SCHEMA_VERSION {
            return Err(CatalogError::UnsupportedSchema {
                schema: file.schema,
                version: file.schema_version,
            });
        }
        let entity_markers = non_empty_list(file.entity_markers, "entity_markers")?;
        let totals_patterns = non_empty_list(file.totals_patterns, "totals_patterns")?;
        if file.entity_label.trim().is_empty() {
            return Err(CatalogError::EmptyField {
                field: "entity_label",
            });
        }

        let mut seen_names = BTreeSet::new();
        for name in &file.output_order {
            if !seen_names.insert(name.as_str()) {
                return Err(CatalogError::DuplicateOutputName { name: name.clone() });
            }
        }

        let mut seen_kinds = BTreeSet::new();
        let mut reports = Vec::with_capacity(file.reports.len());
        for entry in file.reports {
            if !seen_kinds.insert(entry.kind) {
                return Err(CatalogError::DuplicateReport { kind: entry.kind });
            }
            reports.push(build_profile(entry)?);
        }
        if reports.is_empty() {
            return Err(CatalogError::EmptyField { field: "reports" });
        }

        Ok(Self {
            entity_label: file.entity_label,
            exclude_prefix: file.exclude_prefix,
            entity_markers,
            totals_patterns,
            output_order: file.output_order,
            reports,
        })
    }
}

fn non_empty_list(values: Vec<String>, field: &'static str) -> Result<Vec<String>, CatalogError> {
    let values: Vec<String> = values
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect();
    if values.is_empty() {
        return Err(CatalogError::EmptyField { field });
    }
    Ok(values)
}

fn build_profile(entry: ReportEntry) -> Result<ReportProfile, CatalogError> {
    let kind = entry.kind;
    let file_pattern = RegexBuilder::new(&entry.file_pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CatalogError::InvalidPattern { kind, source })?;
    if entry.indicators.is_empty() {
        return Err(CatalogError::NoIndicators { kind });
    }
    let indicators = entry
        .indicators
        .into_iter()
        .map(|IndicatorEntry { fragment, canonical }| {
            if fragment.trim().is_empty() {
                Err(CatalogError::EmptyFragment { kind })
            } else {
                Ok(IndicatorSpec::new(fragment, canonical))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ReportProfile {
        kind,
        label: entry.label.unwrap_or_else(|| kind.title().to_string()),
        file_pattern,
        relabel: entry.relabel.map(|rule| RelabelRule {
            from: rule.from,
            to: rule.to,
        }),
        indicators,
    })
}

/// Parses and validates catalog TOML. `source` is only used in error messages.
pub fn parse_catalog(contents: &str, source: &Path) -> Result<Catalog, CatalogError> {
    let file: CatalogFile = toml::from_str(contents).map_err(|e| CatalogError::Toml {
        path: source.to_path_buf(),
        source: e,
    })?;
    Catalog::from_file(file)
}

/// Loads the catalog embedded in the binary.
pub fn load_default_catalog() -> Result<Catalog, CatalogError> {
    parse_catalog(DEFAULT_CATALOG, Path::new("<embedded catalog.toml>"))
}

/// Loads a catalog from a TOML file on disk.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    parse_catalog(&contents, path)
}
