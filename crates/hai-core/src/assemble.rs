//! Cross-file merging and output ordering.

use serde::Serialize;
use tracing::debug;

use hai_model::{IndicatorMap, IndicatorValue};

/// Indicator values accumulated across every processed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CombinedResult {
    values: IndicatorMap,
}

impl CombinedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one file's values; a later value replaces an earlier one.
    pub fn merge(&mut self, values: &IndicatorMap) {
        for (name, value) in values {
            if let Some(previous) = self.values.insert(name.clone(), value.clone())
                && previous != *value
            {
                debug!(indicator = %name, previous = %previous, value = %value, "indicator overwritten");
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&IndicatorValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &IndicatorMap {
        &self.values
    }

    /// Rows in `output_order`, keeping only names that were extracted.
    pub fn ordered(&self, output_order: &[String]) -> Vec<(String, IndicatorValue)> {
        let mut rows: Vec<(String, IndicatorValue)> = Vec::new();
        for name in output_order {
            if rows.iter().any(|(seen, _)| seen == name) {
                continue;
            }
            if let Some(value) = self.values.get(name) {
                rows.push((name.clone(), value.clone()));
            }
        }
        rows
    }

    /// Extracted names missing from `output_order`; these are not persisted.
    pub fn unlisted(&self, output_order: &[String]) -> Vec<(String, IndicatorValue)> {
        self.values
            .iter()
            .filter(|(name, _)| !output_order.contains(*name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl From<IndicatorMap> for CombinedResult {
    fn from(values: IndicatorMap) -> Self {
        Self { values }
    }
}
