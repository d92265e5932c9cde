use serde::{Deserialize, Serialize};

/// Label given to a distinct value that no rule matches.
pub const OTHER_CLASSIFICATION: &str = "other";

/// Aggregated view of one distinct value of the analyzed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRow {
    pub value: String,
    pub count: usize,
    /// Sorted, de-duplicated source file names.
    pub files: Vec<String>,
    /// Sorted, de-duplicated `COMMENT` values.
    pub comments: Vec<String>,
    /// Sorted, de-duplicated `TYPE` values.
    pub types: Vec<String>,
    pub classification: String,
}

impl ClassificationRow {
    pub fn files_joined(&self) -> String {
        self.files.join(", ")
    }

    pub fn comments_joined(&self) -> String {
        self.comments.join(", ")
    }

    pub fn types_joined(&self) -> String {
        self.types.join(", ")
    }
}
