//! Indicator lookup by column label and canonical fan-out.

use tracing::{debug, info};

use hai_model::{IndicatorMap, IndicatorValue, NormalizedTable};
use hai_standards::IndicatorSpec;

/// One column matched to an indicator fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorMatch {
    pub column: usize,
    pub label: String,
    pub fragment: String,
    /// `None` when the totals-row cell was missing or the indicator was
    /// already taken from an earlier column.
    pub value: Option<IndicatorValue>,
}

/// Values resolved from one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub values: IndicatorMap,
    pub matches: Vec<IndicatorMatch>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reads indicator values from `totals_row`.
///
/// Each column label (trimmed) is compared against the fragments in order and
/// the first contained fragment claims the column. A fragment keeps the value
/// of the first column that yields one; later columns matching the same
/// fragment are ignored. Missing cells are never recorded.
pub fn resolve_indicators(
    table: &NormalizedTable,
    totals_row: usize,
    specs: &[IndicatorSpec],
) -> Resolution {
    let mut resolution = Resolution::default();
    let mut taken = vec![false; specs.len()];

    for (column, label) in table.headers.iter().enumerate() {
        let label = label.trim();
        let Some(spec_index) = specs
            .iter()
            .position(|spec| !spec.fragment.is_empty() && label.contains(spec.fragment.as_str()))
        else {
            continue;
        };
        let spec = &specs[spec_index];

        let value = if taken[spec_index] {
            debug!(column, label, fragment = %spec.fragment, "indicator already resolved from an earlier column");
            None
        } else {
            let cell = table.cell(totals_row, column);
            match cell.and_then(IndicatorValue::from_cell) {
                Some(value) => {
                    for name in spec.output_names() {
                        info!(indicator = name, value = %value, column = label, "indicator extracted");
                        resolution.values.insert(name.to_string(), value.clone());
                    }
                    taken[spec_index] = true;
                    Some(value)
                }
                None => {
                    debug!(column, label, fragment = %spec.fragment, "totals cell is blank, skipped");
                    None
                }
            }
        };

        resolution.matches.push(IndicatorMatch {
            column,
            label: label.to_string(),
            fragment: spec.fragment.clone(),
            value,
        });
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use hai_model::CellValue;

    fn spec(fragment: &str, canonical: &[&str]) -> IndicatorSpec {
        IndicatorSpec::new(
            fragment,
            canonical.iter().map(|name| (*name).to_string()).collect(),
        )
    }

    fn table(headers: &[&str], totals: Vec<CellValue>) -> NormalizedTable {
        NormalizedTable::new(
            headers.iter().map(|h| (*h).to_string()).collect(),
            vec![totals],
        )
    }

    #[test]
    fn fans_out_to_every_canonical_name() {
        let table = table(
            &["科室", "新发感染人数"],
            vec![CellValue::from("全院"), CellValue::from(6.0)],
        );
        let specs = [spec("新发感染人数", &["医院感染新发病例数", "同期应报告医院感染病例总数"])];
        let resolution = resolve_indicators(&table, 0, &specs);

        assert_eq!(resolution.values.len(), 2);
        assert_eq!(
            resolution.values.get("医院感染新发病例数"),
            Some(&IndicatorValue::Number(6.0))
        );
        assert_eq!(
            resolution.values.get("同期应报告医院感染病例总数"),
            Some(&IndicatorValue::Number(6.0))
        );
    }

    #[test]
    fn unmapped_fragment_is_recorded_under_itself() {
        let table = table(
            &["科室", " 漏报病例数 "],
            vec![CellValue::from("全院"), CellValue::from(1.0)],
        );
        let resolution = resolve_indicators(&table, 0, &[spec("漏报病例数", &[])]);
        assert_eq!(
            resolution.values.get("漏报病例数"),
            Some(&IndicatorValue::Number(1.0))
        );
    }

    #[test]
    fn first_fragment_claims_the_column() {
        let table = table(
            &["科室", "感染例次数"],
            vec![CellValue::from("全院"), CellValue::from(9.0)],
        );
        let specs = [spec("感染例次", &["A"]), spec("感染例次数", &["B"])];
        let resolution = resolve_indicators(&table, 0, &specs);
        assert_eq!(resolution.values.keys().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(resolution.matches.len(), 1);
    }

    #[test]
    fn missing_cells_are_skipped_and_text_is_kept() {
        let table = table(
            &["科室", "感染人数", "感染率"],
            vec![CellValue::from("全院"), CellValue::Empty, CellValue::from("1.2%")],
        );
        let specs = [spec("感染人数", &["A"]), spec("感染率", &["B"])];
        let resolution = resolve_indicators(&table, 0, &specs);

        assert!(!resolution.values.contains_key("A"));
        assert_eq!(
            resolution.values.get("B"),
            Some(&IndicatorValue::Text("1.2%".to_string()))
        );
        assert_eq!(resolution.matches[0].value, None);
    }

    #[test]
    fn first_column_with_a_value_wins() {
        let table = table(
            &["科室", "感染人数(本月)", "感染人数(累计)"],
            vec![CellValue::from("全院"), CellValue::from(3.0), CellValue::from(8.0)],
        );
        let resolution = resolve_indicators(&table, 0, &[spec("感染人数", &["A"])]);
        assert_eq!(resolution.values.get("A"), Some(&IndicatorValue::Number(3.0)));
        assert_eq!(resolution.matches.len(), 2);
        assert_eq!(resolution.matches[1].value, None);
    }

    #[test]
    fn later_column_fills_a_blank_earlier_one() {
        let table = table(
            &["科室", "感染人数(本月)", "感染人数(累计)"],
            vec![CellValue::from("全院"), CellValue::Empty, CellValue::from(8.0)],
        );
        let resolution = resolve_indicators(&table, 0, &[spec("感染人数", &["A"])]);
        assert_eq!(resolution.values.get("A"), Some(&IndicatorValue::Number(8.0)));
    }

    #[test]
    fn duplicate_labels_are_addressed_by_position() {
        let table = table(
            &["科室", "手卫生依从率", "手卫生依从率"],
            vec![CellValue::from("全院"), CellValue::from(0.9), CellValue::from(0.8)],
        );
        let resolution = resolve_indicators(&table, 0, &[spec("手卫生依从率", &["A"])]);
        assert_eq!(resolution.values.get("A"), Some(&IndicatorValue::Number(0.9)));
    }

    #[test]
    fn no_matching_column_is_empty() {
        let table = table(&["科室", "备注"], vec![CellValue::from("全院"), CellValue::from(1.0)]);
        assert!(resolve_indicators(&table, 0, &[spec("感染人数", &["A"])]).is_empty());
    }
}
