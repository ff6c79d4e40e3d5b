//! Catalog data embedded at compile time.

/// Built-in indicator catalog (TOML).
pub const DEFAULT_CATALOG: &str = include_str!("../data/catalog.toml");
