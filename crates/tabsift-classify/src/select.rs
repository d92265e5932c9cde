use tabsift_model::DEFAULT_TARGET_COLUMN;

/// Suffix marking identifier-like columns.
pub const ID_SUFFIX: &str = "_id";

/// Picks the column to analyze: the first whose trimmed, lower-cased name
/// ends in `_id`, else [`DEFAULT_TARGET_COLUMN`].
pub fn select_target_column<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| name.as_ref())
        .find(|name| name.trim().to_lowercase().ends_with(ID_SUFFIX))
        .unwrap_or(DEFAULT_TARGET_COLUMN)
        .to_string()
}
