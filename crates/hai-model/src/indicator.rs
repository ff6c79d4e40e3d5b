//! Extracted indicator values keyed by canonical name.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{CellValue, format_numeric};

/// Value recorded for an indicator.
///
/// Numeric cells are normalized to `f64`; anything else is kept as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Number(f64),
    Text(String),
}

impl IndicatorValue {
    /// Converts a cell into an indicator value, or `None` for missing cells.
    pub fn from_cell(cell: &CellValue) -> Option<Self> {
        if cell.is_missing() {
            return None;
        }
        match cell {
            CellValue::Number(value) => Some(Self::Number(*value)),
            other => Some(Self::Text(other.display_string())),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => f.write_str(&format_numeric(*value)),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Canonical indicator name to value.
pub type IndicatorMap = BTreeMap<String, IndicatorValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells_have_no_value() {
        assert_eq!(IndicatorValue::from_cell(&CellValue::Empty), None);
        assert_eq!(
            IndicatorValue::from_cell(&CellValue::Number(f64::NAN)),
            None
        );
    }

    #[test]
    fn numbers_and_text_are_kept() {
        assert_eq!(
            IndicatorValue::from_cell(&CellValue::Number(10.0)),
            Some(IndicatorValue::Number(10.0))
        );
        assert_eq!(
            IndicatorValue::from_cell(&CellValue::from("待补充")),
            Some(IndicatorValue::Text("待补充".to_string()))
        );
        assert_eq!(
            IndicatorValue::from_cell(&CellValue::Bool(true)),
            Some(IndicatorValue::Text("TRUE".to_string()))
        );
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            IndicatorValue::Number(2.0),
            IndicatorValue::Text("n/a".to_string()),
        ])
        .expect("serialize values");
        assert_eq!(json, r#"[2.0,"n/a"]"#);
    }
}
