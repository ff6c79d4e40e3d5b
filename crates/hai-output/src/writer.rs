//! Summary writers.

use std::fs;
use std::path::Path;

use tracing::info;

use hai_model::IndicatorValue;

use crate::error::{OutputError, Result};
use crate::path::OutputFormat;

const SHEET_NAME: &str = "Sheet1";

/// Writes the ordered summary to `path`, creating parent directories.
///
/// Layout: A1 is blank and B1 holds `entity_label`; each following row holds
/// an indicator name in column A and its value in column B.
pub fn write_summary(
    path: &Path,
    entity_label: &str,
    rows: &[(String, IndicatorValue)],
    format: OutputFormat,
) -> Result<()> {
    ensure_parent_dir(path)?;
    match format {
        OutputFormat::Xlsx => write_xlsx(path, entity_label, rows)?,
        OutputFormat::Csv => write_csv(path, entity_label, rows)?,
    }
    info!(path = %path.display(), rows = rows.len(), format = %format, "summary written");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn write_xlsx(path: &Path, entity_label: &str, rows: &[(String, IndicatorValue)]) -> Result<()> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut(SHEET_NAME)
        .ok_or_else(|| OutputError::Workbook {
            path: path.to_path_buf(),
            message: format!("new workbook has no sheet named {SHEET_NAME}"),
        })?;

    // Coordinates are (column, row), both 1-based.
    sheet.get_cell_mut((2u32, 1u32)).set_value_string(entity_label);
    for (offset, (name, value)) in rows.iter().enumerate() {
        let row = offset as u32 + 2;
        sheet.get_cell_mut((1u32, row)).set_value_string(name.as_str());
        let cell = sheet.get_cell_mut((2u32, row));
        match value {
            IndicatorValue::Number(number) => {
                cell.set_value_number(*number);
            }
            IndicatorValue::Text(text) => {
                cell.set_value_string(text.as_str());
            }
        }
    }

    let mut out: Vec<u8> = Vec::new();
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut out).map_err(|e| {
        OutputError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    fs::write(path, out).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_csv(path: &Path, entity_label: &str, rows: &[(String, IndicatorValue)]) -> Result<()> {
    let csv_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(["", entity_label]).map_err(csv_error)?;
    for (name, value) in rows {
        writer
            .write_record([name.as_str(), value.to_string().as_str()])
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}
