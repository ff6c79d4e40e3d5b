//! Worksheet loading into headerless grids.
//!
//! Only the first worksheet is read. The workbook is opened by extension first;
//! if that fails (wrong extension, legacy format quirks) the bytes are read and
//! the format is sniffed from content instead.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, DataType, Range, Reader, open_workbook_auto, open_workbook_auto_from_rs};
use tracing::{debug, warn};

use hai_model::{CellValue, RawGrid};

use crate::error::{IngestError, Result};

/// Reads the first worksheet of a workbook as a raw grid.
///
/// Cell positions are absolute: empty rows and columns in front of the used
/// range are padded with empty cells.
pub fn load_raw_grid(path: &Path) -> Result<RawGrid> {
    let range = match read_by_extension(path) {
        Ok(range) => range,
        Err(primary) => {
            warn!(
                path = %path.display(),
                error = %primary,
                "standard workbook read failed, retrying with content detection"
            );
            read_by_content(path).map_err(|fallback| match fallback {
                FallbackError::Io(source) => IngestError::FileRead {
                    path: path.to_path_buf(),
                    source,
                },
                FallbackError::NoWorksheet => IngestError::NoWorksheet {
                    path: path.to_path_buf(),
                },
                FallbackError::Workbook(message) => IngestError::WorkbookRead {
                    path: path.to_path_buf(),
                    primary,
                    fallback: message,
                },
            })?
        }
    };
    let grid = range_to_grid(&range);
    debug!(
        path = %path.display(),
        rows = grid.height(),
        columns = grid.width(),
        "workbook read"
    );
    Ok(grid)
}

fn read_by_extension(path: &Path) -> std::result::Result<Range<Data>, String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| e.to_string())?;
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(e.to_string()),
        None => Err("workbook has no worksheets".to_string()),
    }
}

enum FallbackError {
    Io(std::io::Error),
    NoWorksheet,
    Workbook(String),
}

fn read_by_content(path: &Path) -> std::result::Result<Range<Data>, FallbackError> {
    let bytes = std::fs::read(path).map_err(FallbackError::Io)?;
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| FallbackError::Workbook(e.to_string()))?;
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(FallbackError::Workbook(e.to_string())),
        None => Err(FallbackError::NoWorksheet),
    }
}

fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let Some((start_row, start_col)) = range.start() else {
        return RawGrid::default();
    };
    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    RawGrid::new(rows)
}

/// Converts a worksheet cell into a grid cell.
///
/// Error cells (`#DIV/0!`, `#N/A`, ...) are treated as missing.
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::String(value) => CellValue::text(value.as_str()),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => cell
            .as_datetime()
            .map(|value| value.to_string())
            .map(CellValue::text)
            .unwrap_or_else(|| CellValue::text(cell.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn converts_scalar_cells() {
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_cell(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            convert_cell(&Data::String("全院".to_string())),
            CellValue::Text("全院".to_string())
        );
        assert_eq!(convert_cell(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_cell(&Data::Error(CellErrorType::Div0)),
            CellValue::Empty
        );
    }

    #[test]
    fn pads_offset_ranges() {
        let mut range: Range<Data> = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("科室".to_string()));
        range.set_value((2, 3), Data::Float(4.0));

        let grid = range_to_grid(&range);
        assert_eq!(grid.height(), 3);
        assert!(grid.rows[0].is_empty());
        assert_eq!(grid.cell(1, 2), Some(&CellValue::Text("科室".to_string())));
        assert_eq!(grid.cell(2, 3), Some(&CellValue::Number(4.0)));
        assert_eq!(grid.cell(2, 0), Some(&CellValue::Empty));
    }

    #[test]
    fn empty_range_is_empty_grid() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_grid(&range).is_empty());
    }
}
