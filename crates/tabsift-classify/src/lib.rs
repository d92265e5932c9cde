//! Classification of the distinct values of one column.
//!
//! - [`load_rules`] reads the ordered rule set from JSON.
//! - [`select_target_column`] picks the column to analyze.
//! - [`RuleEngine`] evaluates rules first-match-wins.
//! - [`classify_frame`] groups a combined table by the target column and
//!   labels every distinct value.

pub mod classifier;
pub mod engine;
pub mod error;
pub mod loader;
pub mod select;

pub use classifier::{
    CLASSIFICATION_HEADERS, classification_frame, classify_frame, occurrence_column_name,
    occurrence_counts,
};
pub use engine::{CompiledRule, RuleEngine, classification_record};
pub use error::{ClassifyError, Result};
pub use loader::{load_rules, parse_rules};
pub use select::{ID_SUFFIX, select_target_column};
