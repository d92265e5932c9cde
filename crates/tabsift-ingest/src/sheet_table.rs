//! Cleaning a raw worksheet grid into a table with named columns.

use std::collections::BTreeSet;
use std::path::Path;

use polars::prelude::DataFrame;
use tracing::debug;

use tabsift_common::string_frame;
use tabsift_model::{CellValue, FILE_NAME_COLUMN, SheetGrid};

use crate::error::{IngestError, Result};
use crate::workbook::read_first_sheet;

/// Prefix for columns whose header cell is blank.
const UNNAMED_PREFIX: &str = "UNNAMED_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Non-blank rows above the header row that carry a sheet title.
    pub title_rows: usize,
}

impl IngestOptions {
    pub fn with_title_rows(title_rows: usize) -> Self {
        Self { title_rows }
    }
}

/// A cleaned worksheet: header names plus typed data rows of equal width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes rows and columns in which every cell is blank.
///
/// Ragged rows are padded to the widest row first. A row or column with a
/// single non-blank cell is kept.
pub fn clean_grid(grid: Vec<Vec<CellValue>>) -> Vec<Vec<CellValue>> {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut rows: Vec<Vec<CellValue>> = grid
        .into_iter()
        .filter(|row| !row.iter().all(CellValue::is_blank))
        .map(|mut row| {
            row.resize(width, CellValue::Missing);
            row
        })
        .collect();

    let keep: Vec<bool> = (0..width)
        .map(|idx| rows.iter().any(|row| !row[idx].is_blank()))
        .collect();
    if keep.iter().all(|k| *k) {
        return rows;
    }
    for row in &mut rows {
        let mut idx = 0;
        row.retain(|_| {
            let kept = keep[idx];
            idx += 1;
            kept
        });
    }
    rows
}

/// Names for the header row: blank cells get a positional name and
/// duplicates get a numeric suffix.
fn unique_headers(raw: &[CellValue]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, cell) in raw.iter().enumerate() {
        let base = match normalize_header(&cell.to_string()) {
            name if name.is_empty() => format!("{UNNAMED_PREFIX}{}", idx + 1),
            name => name,
        };
        let mut name = base.clone();
        let mut suffix = 2;
        while !seen.insert(name.clone()) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        headers.push(name);
    }
    headers
}

/// Builds a table from a raw grid.
///
/// Blank rows are dropped, `title_rows` leading rows are skipped, blank
/// columns are dropped, and the first remaining row becomes the header.
pub fn build_sheet_table(grid: Vec<Vec<CellValue>>, options: &IngestOptions) -> SheetTable {
    let body: Vec<Vec<CellValue>> = clean_grid(grid)
        .into_iter()
        .skip(options.title_rows)
        .collect();
    let mut rows = clean_grid(body).into_iter();
    let Some(header_row) = rows.next() else {
        return SheetTable::default();
    };
    SheetTable {
        headers: unique_headers(&header_row),
        rows: rows.collect(),
    }
}

/// Reads and cleans the first worksheet of `path`.
pub fn read_sheet_table(path: &Path, options: &IngestOptions) -> Result<SheetTable> {
    let grid = read_first_sheet(path)?;
    let table = build_sheet_table(grid, options);
    if table.headers.is_empty() {
        return Err(IngestError::EmptySheet {
            path: path.to_path_buf(),
        });
    }
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "cleaned worksheet"
    );
    Ok(table)
}

/// Reads the first worksheet of `path` straight into a DataFrame.
pub fn read_frame(path: &Path, options: &IngestOptions) -> Result<DataFrame> {
    read_sheet_table(path, options)?.to_frame()
}

impl SheetTable {
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    fn remove_column(&mut self, idx: usize) {
        self.headers.remove(idx);
        for row in &mut self.rows {
            if idx < row.len() {
                row.remove(idx);
            }
        }
    }

    /// Sets the column `name` to `values`, appending it when absent.
    ///
    /// Rows beyond the end of `values` get `Missing`.
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                self.headers.len() - 1
            }
        };
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.resize(self.headers.len(), CellValue::Missing);
            row[idx] = values.next().unwrap_or(CellValue::Missing);
        }
    }

    /// Tags every row with the `file_name` column.
    ///
    /// A source column already named `file_name` (any case) is replaced.
    #[must_use]
    pub fn with_file_name(mut self, file_name: &str) -> Self {
        while let Some(idx) = self
            .headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(FILE_NAME_COLUMN))
        {
            debug!(column = %self.headers[idx], "replacing source column with file name tag");
            self.remove_column(idx);
        }
        let values = vec![CellValue::text(file_name); self.height()];
        self.set_column(FILE_NAME_COLUMN, values);
        self
    }

    /// Stacks tables on top of each other.
    ///
    /// Columns are the union of all headers in first-seen order; a table
    /// without some column contributes `Missing` cells to it.
    pub fn concat(tables: &[SheetTable]) -> SheetTable {
        let mut headers: Vec<String> = Vec::new();
        for table in tables {
            for header in &table.headers {
                if !headers.contains(header) {
                    headers.push(header.clone());
                }
            }
        }
        let mut rows = Vec::with_capacity(tables.iter().map(SheetTable::height).sum());
        for table in tables {
            let positions: Vec<Option<usize>> =
                headers.iter().map(|name| table.column_index(name)).collect();
            for row in &table.rows {
                rows.push(
                    positions
                        .iter()
                        .map(|pos| {
                            pos.and_then(|idx| row.get(idx).cloned())
                                .unwrap_or(CellValue::Missing)
                        })
                        .collect(),
                );
            }
        }
        SheetTable { headers, rows }
    }

    /// Text of every cell in column `name`, `None` for blank cells.
    pub fn column_text(&self, name: &str) -> Option<Vec<Option<String>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| {
                    row.get(idx)
                        .filter(|cell| !cell.is_blank())
                        .map(ToString::to_string)
                })
                .collect(),
        )
    }

    /// Converts the table to a DataFrame of nullable strings.
    ///
    /// Cells keep the text a reader sees, so dates appear as ISO 8601.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns: Vec<(String, Vec<Option<String>>)> = self
            .headers
            .iter()
            .map(|header| (header.clone(), self.column_text(header).unwrap_or_default()))
            .collect();
        Ok(string_frame(columns)?)
    }

    /// Header row plus typed data rows as a worksheet.
    pub fn to_grid(&self, sheet_name: &str) -> SheetGrid {
        let mut grid = SheetGrid::new(sheet_name);
        grid.push_row(self.headers.iter().cloned().map(CellValue::Text).collect());
        for row in &self.rows {
            grid.push_row(row.clone());
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<CellValue>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| CellValue::text(*cell)).collect())
            .collect()
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> SheetTable {
        SheetTable {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: grid(rows),
        }
    }

    #[test]
    fn test_clean_grid_keeps_row_with_one_value() {
        let cleaned = clean_grid(grid(&[
            &["A", "", "B"],
            &["", "", ""],
            &["", "", "x"],
            &[" ", "", ""],
        ]));
        assert_eq!(cleaned, grid(&[&["A", "B"], &["", "x"]]));
    }

    #[test]
    fn test_clean_grid_pads_ragged_rows() {
        let cleaned = clean_grid(grid(&[&["A"], &["1", "2"]]));
        assert_eq!(cleaned, grid(&[&["A", ""], &["1", "2"]]));
    }

    #[test]
    fn test_clean_grid_keeps_zero_number() {
        let cleaned = clean_grid(vec![
            vec![CellValue::text("A"), CellValue::text("B")],
            vec![CellValue::Missing, CellValue::Number(0.0)],
        ]);
        assert_eq!(cleaned[1], vec![CellValue::Missing, CellValue::Number(0.0)]);
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  COLUMN   NAME "), "COLUMN NAME");
        assert_eq!(normalize_header("\u{feff}ID"), "ID");
    }

    #[test]
    fn test_unique_headers() {
        let headers = unique_headers(&grid(&[&["ID", "", "ID", "ID"]])[0]);
        assert_eq!(headers, vec!["ID", "UNNAMED_2", "ID_2", "ID_3"]);
    }

    #[test]
    fn test_numeric_header_is_named_by_its_text() {
        let headers = unique_headers(&[CellValue::Number(2024.0), CellValue::Bool(true)]);
        assert_eq!(headers, vec!["2024", "TRUE"]);
    }

    #[test]
    fn test_build_sheet_table_skips_title_rows() {
        let table = build_sheet_table(
            grid(&[
                &["Model export", ""],
                &["", ""],
                &["COLUMN_ID", "TYPE"],
                &["A", "x"],
            ]),
            &IngestOptions::with_title_rows(1),
        );
        assert_eq!(table.headers, vec!["COLUMN_ID", "TYPE"]);
        assert_eq!(table.rows, grid(&[&["A", "x"]]));
    }

    #[test]
    fn test_build_sheet_table_empty_grid() {
        let table = build_sheet_table(grid(&[&["", ""]]), &IngestOptions::default());
        assert_eq!(table, SheetTable::default());
    }

    #[test]
    fn test_with_file_name_replaces_existing_column() {
        let tagged = table(&["ID", "File_Name"], &[&["A", "old"], &["B", ""]]).with_file_name("orders");
        assert_eq!(tagged.headers, vec!["ID", "file_name"]);
        assert_eq!(tagged.rows, grid(&[&["A", "orders"], &["B", "orders"]]));
    }

    #[test]
    fn test_set_column_overwrites_by_name() {
        let mut t = table(&["ID", "COUNT ID"], &[&["A", "stale"], &["B", "stale"]]);
        t.set_column("COUNT ID", vec![CellValue::Number(2.0)]);
        assert_eq!(t.headers, vec!["ID", "COUNT ID"]);
        assert_eq!(t.rows[0][1], CellValue::Number(2.0));
        assert_eq!(t.rows[1][1], CellValue::Missing);
    }

    #[test]
    fn test_concat_unions_columns_in_first_seen_order() {
        let first = table(&["ID", "TYPE"], &[&["A", "x"]]);
        let mut second = table(&["ID", "COMMENT"], &[&["B", ""]]);
        second.rows[0][1] = CellValue::Number(7.0);

        let combined = SheetTable::concat(&[first, second]);

        assert_eq!(combined.headers, vec!["ID", "TYPE", "COMMENT"]);
        assert_eq!(
            combined.rows,
            vec![
                vec![CellValue::text("A"), CellValue::text("x"), CellValue::Missing],
                vec![CellValue::text("B"), CellValue::Missing, CellValue::Number(7.0)],
            ]
        );
    }

    #[test]
    fn test_concat_of_nothing_is_empty() {
        assert_eq!(SheetTable::concat(&[]), SheetTable::default());
    }

    #[test]
    fn test_to_frame_uses_display_text() {
        let mut t = table(&["ID", "AMOUNT"], &[&["A", ""], &["B", ""]]);
        t.rows[0][1] = CellValue::Number(12.5);
        let df = t.to_frame().unwrap();
        assert_eq!(
            tabsift_common::column_strings(&df, "AMOUNT").unwrap(),
            vec![Some("12.5".to_string()), None]
        );
    }

    #[test]
    fn test_to_grid_prepends_header_row() {
        let t = table(&["ID"], &[&["A"]]);
        let sheet = t.to_grid("Sheet1");
        assert_eq!(sheet.name, "Sheet1");
        assert_eq!(sheet.rows, vec![vec![CellValue::text("ID")], vec![CellValue::text("A")]]);
    }
}
