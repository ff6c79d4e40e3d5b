//! Header row detection.

use tracing::{debug, info};

use hai_model::{CellValue, RawGrid};

const PROBE_SEPARATOR: &str = "|";

/// A header row found by fragment search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub index: usize,
    /// Fragments found in the row, in the order they were searched.
    pub matched: Vec<String>,
}

/// Joins the non-missing cells of a row into one probe string.
pub fn row_probe(row: &[CellValue]) -> String {
    row.iter()
        .filter(|cell| !cell.is_missing())
        .map(CellValue::display_string)
        .collect::<Vec<_>>()
        .join(PROBE_SEPARATOR)
}

/// Finds the first row whose probe contains any of `fragments`.
pub fn find_header_row(grid: &RawGrid, fragments: &[&str]) -> Option<HeaderMatch> {
    grid.rows.iter().enumerate().find_map(|(index, row)| {
        let probe = row_probe(row);
        let matched: Vec<String> = fragments
            .iter()
            .filter(|fragment| !fragment.is_empty() && probe.contains(**fragment))
            .map(|fragment| (*fragment).to_string())
            .collect();
        (!matched.is_empty()).then_some(HeaderMatch { index, matched })
    })
}

/// Returns the header row index, defaulting to 0 when no row matches.
pub fn locate_header_row(grid: &RawGrid, fragments: &[&str]) -> usize {
    match find_header_row(grid, fragments) {
        Some(header) => {
            info!(
                row = header.index,
                matched = %header.matched.join(", "),
                "header row located"
            );
            header.index
        }
        None => {
            debug!(rows = grid.height(), "no header row matched, using row 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: Vec<Vec<CellValue>>) -> RawGrid {
        RawGrid::new(rows)
    }

    #[test]
    fn probe_skips_missing_cells() {
        let row = vec![
            CellValue::Empty,
            CellValue::from("科室"),
            CellValue::Number(f64::NAN),
            CellValue::from(3.0),
        ];
        assert_eq!(row_probe(&row), "科室|3");
    }

    #[test]
    fn returns_first_matching_row() {
        let grid = grid(vec![
            vec![CellValue::from("2024年第一季度")],
            vec![CellValue::from("科室"), CellValue::from("感染例次数")],
            vec![CellValue::from("感染例次数"), CellValue::from("感染人数")],
        ]);
        let header = find_header_row(&grid, &["感染人数", "感染例次数"]).unwrap();
        assert_eq!(header.index, 1);
        assert_eq!(header.matched, vec!["感染例次数".to_string()]);
        assert_eq!(locate_header_row(&grid, &["感染人数"]), 2);
    }

    #[test]
    fn defaults_to_zero() {
        let grid = grid(vec![
            vec![CellValue::from("科室")],
            vec![CellValue::from("内科")],
        ]);
        assert_eq!(find_header_row(&grid, &["手卫生"]), None);
        assert_eq!(locate_header_row(&grid, &["手卫生"]), 0);
        assert_eq!(locate_header_row(&RawGrid::default(), &["手卫生"]), 0);
    }

    #[test]
    fn fragment_does_not_span_cells() {
        let grid = grid(vec![vec![CellValue::from("感染"), CellValue::from("人数")]]);
        assert_eq!(find_header_row(&grid, &["感染人数"]), None);
    }
}
