//! Header-applied tables produced by grid normalization.

use crate::cell::CellValue;

/// Table with a header row and data rows.
///
/// Column labels need not be unique. Column 0 holds the entity label
/// (a department or the hospital-wide aggregate) once normalization has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl NormalizedTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// A table with no columns or no rows carries nothing to extract.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    /// Stringified values of the entity column, one per row.
    pub fn entity_values(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.first().map(CellValue::display_string).unwrap_or_default())
            .collect()
    }

    /// Distinct entity labels in first-seen order.
    pub fn distinct_entities(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for value in self.entity_values() {
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_entities_keep_order() {
        let table = NormalizedTable::new(
            vec!["科室".to_string(), "感染人数".to_string()],
            vec![
                vec![CellValue::from("内科"), CellValue::from(1.0)],
                vec![CellValue::from("外科"), CellValue::from(2.0)],
                vec![CellValue::from("内科"), CellValue::from(3.0)],
            ],
        );
        assert_eq!(table.distinct_entities(), vec!["内科", "外科"]);
        assert!(!table.is_empty());
    }

    #[test]
    fn table_without_rows_is_empty() {
        let table = NormalizedTable::new(vec!["科室".to_string()], Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.width(), 1);
    }
}
