use std::path::PathBuf;
use thiserror::Error;

use tabsift_ingest::IngestError;

/// Errors from writing workbooks.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write workbook {path}: {source}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("failed to replace {path}: {source}")]
    Replace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sheet '{sheet}' exceeds the worksheet size limits")]
    SheetTooLarge { sheet: String },

    #[error("failed to read existing workbook: {0}")]
    Read(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, OutputError>;
