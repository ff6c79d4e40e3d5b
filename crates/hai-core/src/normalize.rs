//! Grid normalization: header adoption, blank stripping, entity column placement.

use tracing::debug;

use hai_model::{CellValue, NormalizedTable, RawGrid};
use hai_standards::RelabelRule;

use crate::error::NormalizeError;

/// Report-specific inputs to [`normalize_grid`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions<'a> {
    /// Fragments identifying the entity column.
    pub entity_markers: &'a [String],
    /// Optional label rewrite applied before blank stripping.
    pub relabel: Option<&'a RelabelRule>,
}

/// Turns a raw grid into a table headed by row `header_index`.
///
/// Rows above and including the header are discarded. Fully blank rows are
/// dropped first, then columns that are blank in every remaining row. If the
/// first column does not look like the entity column, the first column that
/// does is moved to the front.
pub fn normalize_grid(
    grid: &RawGrid,
    header_index: usize,
    options: NormalizeOptions<'_>,
) -> Result<NormalizedTable, NormalizeError> {
    let width = grid.width();
    let Some(header_row) = grid.rows.get(header_index) else {
        return Err(NormalizeError::EmptyAfterCleaning);
    };

    let mut headers: Vec<String> = (0..width)
        .map(|col| {
            header_row
                .get(col)
                .map(CellValue::display_string)
                .unwrap_or_default()
        })
        .collect();

    if let Some(rule) = options.relabel {
        for label in &mut headers {
            if let Some(relabeled) = rule.apply(label) {
                debug!(from = %label, to = %relabeled, "column relabeled");
                *label = relabeled;
            }
        }
    }

    let rows: Vec<Vec<CellValue>> = grid.rows[header_index + 1..]
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.is_missing()))
        .map(|row| {
            let mut cells = row.clone();
            cells.resize(width, CellValue::Empty);
            cells
        })
        .collect();

    let kept: Vec<usize> = (0..width)
        .filter(|&col| rows.iter().any(|row| !row[col].is_missing()))
        .collect();
    if rows.is_empty() || kept.is_empty() {
        return Err(NormalizeError::EmptyAfterCleaning);
    }
    if kept.len() < width {
        debug!(
            dropped = width - kept.len(),
            kept = kept.len(),
            "blank columns dropped"
        );
    }

    let mut headers: Vec<String> = kept.iter().map(|&col| headers[col].clone()).collect();
    let mut rows: Vec<Vec<CellValue>> = rows
        .into_iter()
        .map(|row| kept.iter().map(|&col| row[col].clone()).collect())
        .collect();

    let is_entity = |label: &str| options.entity_markers.iter().any(|m| label.contains(m.as_str()));
    if !is_entity(headers[0].as_str())
        && let Some(position) = headers.iter().position(|label| is_entity(label.as_str()))
    {
        debug!(column = %headers[position], from = position, "entity column moved to front");
        let label = headers.remove(position);
        headers.insert(0, label);
        for row in &mut rows {
            let cell = row.remove(position);
            row.insert(0, cell);
        }
    }

    Ok(NormalizedTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        vec!["科室".into(), "全院".into(), "合计".into()]
    }

    fn options(markers: &[String]) -> NormalizeOptions<'_> {
        NormalizeOptions {
            entity_markers: markers,
            relabel: None,
        }
    }

    #[test]
    fn adopts_header_and_strips_blanks() {
        let grid = RawGrid::new(vec![
            vec![CellValue::from("标题")],
            vec![
                CellValue::from("科室"),
                CellValue::from("备注"),
                CellValue::from("感染人数"),
            ],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
            vec![CellValue::from("内科"), CellValue::Empty, CellValue::from(3.0)],
            vec![CellValue::from("全院")],
        ]);
        let markers = markers();
        let table = normalize_grid(&grid, 1, options(&markers)).unwrap();

        assert_eq!(table.headers, vec!["科室", "感染人数"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.cell(0, 1), Some(&CellValue::Number(3.0)));
        assert_eq!(table.cell(1, 0), Some(&CellValue::from("全院")));
        assert_eq!(table.cell(1, 1), Some(&CellValue::Empty));
    }

    #[test]
    fn moves_entity_column_to_front() {
        let grid = RawGrid::new(vec![
            vec![
                CellValue::from("序号"),
                CellValue::from("感染人数"),
                CellValue::from("科室名称"),
            ],
            vec![CellValue::from(1.0), CellValue::from(4.0), CellValue::from("全院")],
        ]);
        let markers = markers();
        let table = normalize_grid(&grid, 0, options(&markers)).unwrap();

        assert_eq!(table.headers, vec!["科室名称", "序号", "感染人数"]);
        assert_eq!(
            table.rows[0],
            vec![CellValue::from("全院"), CellValue::from(1.0), CellValue::from(4.0)]
        );
    }

    #[test]
    fn leaves_columns_when_no_entity_marker() {
        let grid = RawGrid::new(vec![
            vec![CellValue::from("名称"), CellValue::from("感染人数")],
            vec![CellValue::from("全院"), CellValue::from(4.0)],
        ]);
        let markers = markers();
        let table = normalize_grid(&grid, 0, options(&markers)).unwrap();
        assert_eq!(table.headers, vec!["名称", "感染人数"]);
    }

    #[test]
    fn relabels_before_cleaning() {
        let rule = RelabelRule {
            from: "同期住院患者人数".into(),
            to: "现患率-同期住院患者人数".into(),
        };
        let grid = RawGrid::new(vec![
            vec![CellValue::from("科室"), CellValue::from("同期住院患者人数")],
            vec![CellValue::from("全院"), CellValue::from(812.0)],
        ]);
        let markers = markers();
        let table = normalize_grid(
            &grid,
            0,
            NormalizeOptions {
                entity_markers: &markers,
                relabel: Some(&rule),
            },
        )
        .unwrap();
        assert_eq!(table.headers[1], "现患率-同期住院患者人数");
    }

    #[test]
    fn header_only_grid_is_empty_after_cleaning() {
        let grid = RawGrid::new(vec![
            vec![CellValue::from("科室"), CellValue::from("感染人数")],
            vec![CellValue::Empty, CellValue::Empty],
        ]);
        let markers = markers();
        assert_eq!(
            normalize_grid(&grid, 0, options(&markers)),
            Err(NormalizeError::EmptyAfterCleaning)
        );
        assert_eq!(
            normalize_grid(&RawGrid::default(), 0, options(&markers)),
            Err(NormalizeError::EmptyAfterCleaning)
        );
    }

    #[test]
    fn missing_header_cell_becomes_empty_label() {
        let grid = RawGrid::new(vec![
            vec![CellValue::from("科室")],
            vec![CellValue::from("全院"), CellValue::from(2.0)],
        ]);
        let markers = markers();
        let table = normalize_grid(&grid, 0, options(&markers)).unwrap();
        assert_eq!(table.headers, vec!["科室", ""]);
    }
}
