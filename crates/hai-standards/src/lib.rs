#![deny(unsafe_code)]

//! Indicator catalog for hospital infection surveillance reports.
//!
//! The catalog is plain configuration data: which files belong to which report
//! type, which column-label fragments identify each indicator, the canonical
//! names those indicators are recorded under, and the display order of the
//! final summary. The built-in catalog is embedded at compile time; an
//! operator can supply a replacement TOML file with the same schema.

pub mod catalog;
pub mod embedded;
pub mod error;
pub mod manifest;

pub use crate::catalog::{
    Catalog, IndicatorSpec, RelabelRule, ReportProfile, load_catalog, load_default_catalog,
    parse_catalog,
};
pub use crate::error::CatalogError;
