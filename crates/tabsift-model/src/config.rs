//! Run configuration.

use std::path::{Path, PathBuf};

/// Column added to every cleaned row naming its source file.
pub const FILE_NAME_COLUMN: &str = "file_name";
/// Column analyzed when no column name ends in `_id`.
pub const DEFAULT_TARGET_COLUMN: &str = "COLUMN NAME";
/// Suffix appended to the stem of each cleaned copy.
pub const CLEARED_SUFFIX: &str = "_cleared";
pub const COMBINED_FILE_NAME: &str = "combined_file.xlsx";
/// Sheet holding the table rows in every workbook written.
pub const DATA_SHEET_NAME: &str = "Sheet1";
/// Sheet receiving the classification results.
pub const DEFAULT_SHEET_NAME: &str = "Unique_Values";
pub const DEFAULT_OUTPUT_DIR: &str = "cleaned_models";
pub const DEFAULT_RULES_PATH: &str = "classification_rules.json";

/// Everything a run needs; built from CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Root of the tree searched for spreadsheets.
    pub source_dir: PathBuf,
    /// Destination for cleaned copies and the combined file.
    pub output_dir: PathBuf,
    pub rules_path: PathBuf,
    /// Explicit column to analyze; when `None` the column is picked from the
    /// combined table's headers.
    pub target_column: Option<String>,
    /// Name of the classification sheet.
    pub sheet_name: String,
    /// Leading non-blank rows skipped before the header row.
    pub title_rows: usize,
    /// Whether to append the per-row occurrence count column.
    pub count_column: bool,
}

impl PipelineConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            rules_path: PathBuf::from(DEFAULT_RULES_PATH),
            target_column: None,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            title_rows: 0,
            count_column: true,
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_path = path.into();
        self
    }

    #[must_use]
    pub fn with_target_column(mut self, column: Option<String>) -> Self {
        self.target_column = column;
        self
    }

    #[must_use]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    #[must_use]
    pub fn with_title_rows(mut self, rows: usize) -> Self {
        self.title_rows = rows;
        self
    }

    #[must_use]
    pub fn with_count_column(mut self, enable: bool) -> Self {
        self.count_column = enable;
        self
    }

    /// Path of the combined workbook inside the output directory.
    pub fn combined_path(&self) -> PathBuf {
        self.output_dir.join(COMBINED_FILE_NAME)
    }

    /// Path of the cleaned copy written for `source`.
    pub fn cleared_path(&self, source: &Path) -> PathBuf {
        self.output_dir
            .join(format!("{}{CLEARED_SUFFIX}.xlsx", source_stem(source)))
    }
}

/// File stem used to tag rows and name the cleaned copy.
///
/// Non-UTF-8 stems are converted lossily so the tag and the copy's name
/// always agree.
pub fn source_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
