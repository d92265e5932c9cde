pub mod classification;
pub mod config;
pub mod lookup;
pub mod rules;
pub mod table;

pub use classification::{ClassificationRow, OTHER_CLASSIFICATION};
pub use config::{
    CLEARED_SUFFIX, COMBINED_FILE_NAME, DATA_SHEET_NAME, DEFAULT_OUTPUT_DIR, DEFAULT_RULES_PATH,
    DEFAULT_SHEET_NAME, DEFAULT_TARGET_COLUMN, FILE_NAME_COLUMN, PipelineConfig, source_stem,
};
pub use lookup::{CaseInsensitiveLookup, CaseInsensitiveMap};
pub use rules::{COLUMN_NAME_SENTINEL, Rule, RuleField, RuleSet};
pub use table::{CellValue, SheetGrid};
