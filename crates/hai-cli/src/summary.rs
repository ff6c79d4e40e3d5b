use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hai_cli::pipeline::{BatchResult, FileReport, SummaryRow};
use hai_core::{FileOutcome, SkipReason};
use hai_model::IndicatorValue;

pub fn print_summary(result: &BatchResult, entity_label: &str) {
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    println!("{}", files_table(&result.files));
    println!("{}", summary_table(&result.ordered, entity_label));
    if !result.unlisted.is_empty() {
        println!();
        println!("Extracted but not in output order:");
        println!("{}", summary_table(&result.unlisted, entity_label));
    }
    let skipped: Vec<&FileReport> = result.skipped().collect();
    if !skipped.is_empty() {
        eprintln!("Skipped files:");
        for file in skipped {
            eprintln!("- {}: {}", file.file_name(), describe_outcome(&file.outcome));
        }
    }
}

pub fn print_ordered(output: Option<&Path>, ordered: &[SummaryRow], entity_label: &str) {
    match output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    println!("{}", summary_table(ordered, entity_label));
}

pub fn files_table(files: &[FileReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Report"),
        header_cell("Status"),
        header_cell("Extracted"),
        header_cell("Detail"),
    ]);
    apply_files_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    for file in files {
        let (status, detail) = match &file.outcome {
            FileOutcome::Extracted(_) => (
                Cell::new("OK").fg(Color::Green).add_attribute(Attribute::Bold),
                dim_cell("-"),
            ),
            FileOutcome::Skipped(reason) => (
                Cell::new("SKIPPED").fg(Color::Yellow),
                Cell::new(reason.to_string()),
            ),
        };
        table.add_row(vec![
            Cell::new(file.file_name()),
            Cell::new(file.report.title()),
            status,
            count_cell(file.extracted),
            detail,
        ]);
    }
    table
}

pub fn summary_table(rows: &[SummaryRow], entity_label: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Indicator"), header_cell(entity_label)]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for row in rows {
        let value = match &row.value {
            IndicatorValue::Number(_) => Cell::new(row.value.to_string()),
            IndicatorValue::Text(text) => Cell::new(text).fg(Color::Yellow),
        };
        table.add_row(vec![Cell::new(&row.name), value]);
    }
    table
}

/// One-line description of a file outcome.
pub fn describe_outcome(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Extracted(values) => format!("extracted {} indicator(s)", values.len()),
        FileOutcome::Skipped(SkipReason::ReadFailed { message }) => {
            format!("skipped, unreadable: {message}")
        }
        FileOutcome::Skipped(reason) => format!("skipped, {reason}"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_files_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use hai_model::{IndicatorMap, ReportType};

    fn report(name: &str, outcome: FileOutcome) -> FileReport {
        FileReport {
            path: PathBuf::from(name),
            report: ReportType::HandHygiene,
            extracted: outcome.extracted_count(),
            outcome,
        }
    }

    #[test]
    fn outcome_descriptions() {
        let mut values = IndicatorMap::new();
        values.insert("A".to_string(), IndicatorValue::Number(1.0));
        let lines = [
            FileOutcome::Extracted(values),
            FileOutcome::Skipped(SkipReason::ReadFailed {
                message: "bad zip".to_string(),
            }),
            FileOutcome::Skipped(SkipReason::EmptyAfterCleaning),
            FileOutcome::Skipped(SkipReason::NoTotalsRow {
                entities: vec!["内科".to_string(), "外科".to_string()],
            }),
            FileOutcome::Skipped(SkipReason::NoIndicators {
                columns: vec!["科室".to_string(), "床位数".to_string()],
            }),
        ]
        .iter()
        .map(describe_outcome)
        .collect::<Vec<_>>()
        .join("\n");

        insta::assert_snapshot!(lines, @r"
        extracted 1 indicator(s)
        skipped, unreadable: bad zip
        skipped, no data after cleaning
        skipped, no totals row among [内科, 外科]
        skipped, no indicator columns among [科室, 床位数]
        ");
    }

    #[test]
    fn files_table_lists_every_file() {
        let mut values = IndicatorMap::new();
        values.insert("A".to_string(), IndicatorValue::Number(1.0));
        let files = vec![
            report("good.xlsx", FileOutcome::Extracted(values)),
            report(
                "bad.xlsx",
                FileOutcome::Skipped(SkipReason::EmptyAfterCleaning),
            ),
        ];
        let mut table = files_table(&files);
        table.force_no_tty();
        let rendered = table.to_string();

        assert!(rendered.contains("good.xlsx"));
        assert!(rendered.contains("SKIPPED"));
        assert!(rendered.contains("no data after cleaning"));
        assert_eq!(table.row_iter().count(), 2);
    }

    #[test]
    fn summary_table_keeps_row_order() {
        let rows = vec![
            SummaryRow {
                name: "first".to_string(),
                value: IndicatorValue::Number(2.0),
            },
            SummaryRow {
                name: "second".to_string(),
                value: IndicatorValue::Text("n/a".to_string()),
            },
        ];
        let mut table = summary_table(&rows, "ALL");
        table.force_no_tty();
        let rendered = table.to_string();

        let first = rendered.find("first").unwrap();
        let second = rendered.find("second").unwrap();
        assert!(first < second);
        assert!(rendered.contains("n/a"));
    }
}
