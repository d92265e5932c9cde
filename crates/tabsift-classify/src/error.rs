//! Error types for the classification stage.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Rules file missing or unreadable.
    #[error("failed to read rules file {path}: {source}")]
    RulesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rules file is not a valid rule document.
    #[error("invalid rules file {path}: {source}")]
    RulesParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Target column absent from the combined table.
    #[error("column '{column}' not found in the combined table")]
    ColumnNotFound { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ClassifyError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
