//! Workbook reading via `calamine`.

use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, XlsxError, open_workbook};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use tabsift_model::{CellValue, SheetGrid};

use crate::error::{IngestError, Result};

fn open(path: &Path) -> Result<Xlsx<std::io::BufReader<std::fs::File>>> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    open_workbook(path).map_err(|e: XlsxError| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parses the ISO 8601 text calamine reports for `DateTimeIso` cells.
fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    text.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| text.parse::<NaiveDate>().ok().map(|d| d.and_time(NaiveTime::MIN)))
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Missing,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map_or(CellValue::Number(dt.as_f64()), CellValue::DateTime),
        // Durations have no calendar date; keep the serial day count.
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => {
            parse_iso_datetime(s).map_or_else(|| CellValue::text(s.as_str()), CellValue::DateTime)
        }
        Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(e) => CellValue::text(e.to_string()),
    }
}

/// Reads the first worksheet as a grid of typed cells.
///
/// The grid starts at the first used cell, so leading blank rows and
/// columns of the sheet are not represented.
pub fn read_first_sheet(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let mut workbook = open(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let grid: Vec<Vec<CellValue>> = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    debug!(
        path = %path.display(),
        rows = grid.len(),
        columns = range.width(),
        "read worksheet"
    );
    Ok(grid)
}

/// Place a range at its sheet position so rewriting keeps the layout.
fn positioned_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<CellValue>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![CellValue::Missing; start_col as usize];
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }
    rows
}

/// Reads every worksheet of a workbook, in workbook order.
pub fn read_workbook_grids(path: &Path) -> Result<Vec<SheetGrid>> {
    let mut workbook = open(path)?;
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| IngestError::Workbook {
                path: path.to_path_buf(),
                message: format!("sheet '{name}': {e}"),
            })?;
        sheets.push(SheetGrid {
            rows: positioned_rows(&range),
            name,
        });
    }
    Ok(sheets)
}
