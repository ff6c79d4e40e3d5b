//! Raw spreadsheet cells and headerless grids.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar cell as read from a worksheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    /// Blank, error, or otherwise unreadable cell.
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Builds a text cell, treating an empty string as a blank cell.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    /// Returns true for cells that carry no value.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(value) => value.is_nan(),
            Self::Text(_) | Self::Bool(_) => false,
        }
    }

    /// Returns the numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }

    /// Stringified form used for labels and probe strings.
    ///
    /// Missing cells render as an empty string.
    pub fn display_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(value) if value.is_nan() => String::new(),
            Self::Number(value) => format_numeric(*value),
            Self::Text(value) => value.clone(),
            Self::Bool(value) => if *value { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Headerless two-dimensional grid of cells. Row 0 has no special meaning.
///
/// Rows may have different lengths; cells past the end of a row read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    pub rows: Vec<Vec<CellValue>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }
}
