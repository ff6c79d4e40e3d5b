//! Totals-row (hospital-wide aggregate) selection.

use tracing::{debug, info};

use hai_model::NormalizedTable;

/// The row chosen as the hospital-wide aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsMatch {
    pub row: usize,
    /// Pattern that selected the row; `None` for the single-row fallback.
    pub pattern: Option<String>,
    pub entity: String,
}

/// Selects the totals row by searching entity-column values.
///
/// Patterns are tried in order; the first pattern with any match returns its
/// first matching row. A table with exactly one row falls back to that row.
pub fn resolve_totals_row(table: &NormalizedTable, patterns: &[String]) -> Option<TotalsMatch> {
    let entities = table.entity_values();

    for pattern in patterns.iter().filter(|p| !p.is_empty()) {
        if let Some(row) = entities.iter().position(|value| value.contains(pattern.as_str())) {
            info!(row, pattern = %pattern, entity = %entities[row], "totals row matched");
            return Some(TotalsMatch {
                row,
                pattern: Some(pattern.clone()),
                entity: entities[row].clone(),
            });
        }
    }

    if table.height() == 1 {
        debug!(entity = %entities[0], "single data row used as totals row");
        return Some(TotalsMatch {
            row: 0,
            pattern: None,
            entity: entities[0].clone(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use hai_model::CellValue;

    fn patterns() -> Vec<String> {
        ["全院", "合计", "总计", "汇总", "全院合计"]
            .iter()
            .map(|p| (*p).to_string())
            .collect()
    }

    fn table(entities: &[&str]) -> NormalizedTable {
        NormalizedTable::new(
            vec!["科室".into(), "感染人数".into()],
            entities
                .iter()
                .map(|entity| vec![CellValue::from(*entity), CellValue::from(1.0)])
                .collect(),
        )
    }

    #[test]
    fn earlier_pattern_beats_earlier_row() {
        let table = table(&["内科", "合计", "全院"]);
        let found = resolve_totals_row(&table, &patterns()).unwrap();
        assert_eq!(found.row, 2);
        assert_eq!(found.pattern.as_deref(), Some("全院"));
    }

    #[test]
    fn first_matching_row_for_a_pattern() {
        let table = table(&["全院(一)", "全院(二)"]);
        assert_eq!(resolve_totals_row(&table, &patterns()).unwrap().row, 0);
    }

    #[test]
    fn aggregate_label_matches_before_its_own_pattern() {
        // A 全院合计 row is claimed by the 全院 pattern.
        let table = table(&["外科", "全院合计"]);
        let found = resolve_totals_row(&table, &patterns()).unwrap();
        assert_eq!(found.row, 1);
        assert_eq!(found.pattern.as_deref(), Some("全院"));
    }

    #[test]
    fn single_row_fallback() {
        let table = table(&["ICU"]);
        let found = resolve_totals_row(&table, &patterns()).unwrap();
        assert_eq!(found.row, 0);
        assert_eq!(found.pattern, None);
        assert_eq!(found.entity, "ICU");
    }

    #[test]
    fn no_match_with_several_rows() {
        let table = table(&["内科", "外科"]);
        assert_eq!(resolve_totals_row(&table, &patterns()), None);
    }

    #[test]
    fn numeric_entity_values_are_stringified() {
        let table = NormalizedTable::new(
            vec!["科室".into()],
            vec![vec![CellValue::from(2024.0)], vec![CellValue::from("总计")]],
        );
        assert_eq!(resolve_totals_row(&table, &patterns()).unwrap().row, 1);
    }
}
