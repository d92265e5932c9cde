pub mod discovery;
pub mod error;
pub mod sheet_table;
pub mod workbook;

pub use discovery::{is_spreadsheet_file, list_spreadsheet_files};
pub use error::{IngestError, Result};
pub use sheet_table::{
    IngestOptions, SheetTable, build_sheet_table, clean_grid, read_frame, read_sheet_table,
};
pub use workbook::{read_first_sheet, read_workbook_grids};
