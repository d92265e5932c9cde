//! `.xlsx` writing via `rust_xlsxwriter`.

use std::path::Path;

use polars::prelude::{AnyValue, DataFrame};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::debug;

use tabsift_common::any_to_string;
use tabsift_ingest::read_workbook_grids;
use tabsift_model::{CellValue, SheetGrid};

use crate::error::{OutputError, Result};

/// Converts a frame value to the cell written for it.
pub fn any_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Missing,
        AnyValue::Int8(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int16(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int64(v) => CellValue::Number(v as f64),
        AnyValue::UInt8(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt16(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt32(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt64(v) => CellValue::Number(v as f64),
        AnyValue::Float32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Float64(v) => CellValue::Number(v),
        AnyValue::Boolean(b) => CellValue::Bool(b),
        other => CellValue::text(any_to_string(other)),
    }
}

/// Lays a frame out as a sheet: one header row, then one row per record.
pub fn frame_to_grid(df: &DataFrame, sheet_name: &str) -> SheetGrid {
    let mut grid = SheetGrid::new(sheet_name);
    grid.push_row(
        df.get_column_names_owned()
            .into_iter()
            .map(|name| CellValue::Text(name.to_string()))
            .collect(),
    );
    let columns = df.get_columns();
    for idx in 0..df.height() {
        grid.push_row(
            columns
                .iter()
                .map(|column| any_to_cell(column.get(idx).unwrap_or(AnyValue::Null)))
                .collect(),
        );
    }
    grid
}

/// Number formats for date cells; Excel stores dates as serial numbers.
struct DateFormats {
    date: Format,
    datetime: Format,
}

impl DateFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    formats: &DateFormats,
) -> std::result::Result<(), XlsxError> {
    match cell {
        CellValue::Missing => {}
        CellValue::Text(text) => {
            sheet.write_string(row, col, text)?;
        }
        CellValue::Number(value) => {
            sheet.write_number(row, col, *value)?;
        }
        CellValue::Bool(value) => {
            sheet.write_boolean(row, col, *value)?;
        }
        CellValue::DateTime(value) => {
            let format = if CellValue::is_date_only(value) {
                &formats.date
            } else {
                &formats.datetime
            };
            sheet.write_datetime_with_format(row, col, value, format)?;
        }
    }
    Ok(())
}

fn fill_sheet(workbook: &mut Workbook, grid: &SheetGrid, path: &Path) -> Result<()> {
    let xlsx_error = |source| OutputError::Xlsx {
        path: path.to_path_buf(),
        source,
    };
    let too_large = || OutputError::SheetTooLarge {
        sheet: grid.name.clone(),
    };
    let formats = DateFormats::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(&grid.name).map_err(xlsx_error)?;
    for (r, row) in grid.rows.iter().enumerate() {
        let r = u32::try_from(r).map_err(|_| too_large())?;
        for (c, cell) in row.iter().enumerate() {
            let c = u16::try_from(c).map_err(|_| too_large())?;
            write_cell(sheet, r, c, cell, &formats).map_err(xlsx_error)?;
        }
    }
    Ok(())
}

/// Writes `sheets` as a new workbook at `path`, replacing any existing file.
///
/// The workbook is saved to a sibling temporary file first and then renamed
/// over `path`, so a failed write leaves the previous file intact.
pub fn write_workbook(path: &Path, sheets: &[SheetGrid]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut workbook = Workbook::new();
    for grid in sheets {
        fill_sheet(&mut workbook, grid, path)?;
    }
    let staging = path.with_extension("xlsx.partial");
    workbook.save(&staging).map_err(|e| OutputError::Xlsx {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::rename(&staging, path).map_err(|e| OutputError::Replace {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), sheet_count = sheets.len(), "wrote workbook");
    Ok(())
}

/// Puts `sheet` into the workbook at `path`.
///
/// A sheet with the same name keeps its position and is replaced; otherwise
/// the sheet is appended. Every other sheet is carried over cell by cell.
pub fn replace_sheet(path: &Path, sheet: SheetGrid) -> Result<()> {
    let mut sheets = read_workbook_grids(path)?;
    match sheets.iter().position(|s| s.name == sheet.name) {
        Some(idx) => {
            debug!(sheet = %sheet.name, "replacing existing sheet");
            sheets[idx] = sheet;
        }
        None => sheets.push(sheet),
    }
    write_workbook(path, &sheets)
}
