//! Workbook output for tabsift.
//!
//! - Cleaned per-file copies and the combined table are written as
//!   single-sheet `.xlsx` workbooks from typed grids, so numbers stay numbers
//!   and dates keep a date format.
//! - The classification sheet is added to an existing workbook by rewriting
//!   it with the sheet of the same name replaced.

mod error;
mod xlsx;

pub use error::{OutputError, Result};
pub use xlsx::{any_to_cell, frame_to_grid, replace_sheet, write_workbook};
