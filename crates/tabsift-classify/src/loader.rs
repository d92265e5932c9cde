//! Rule set loading.

use std::path::Path;

use tracing::{debug, warn};

use tabsift_model::RuleSet;

use crate::error::{ClassifyError, Result};

/// Parse a rule document, attributing errors to `path`.
pub fn parse_rules(json: &str, path: &Path) -> Result<RuleSet> {
    let rules: RuleSet = serde_json::from_str(json).map_err(|e| ClassifyError::RulesParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    for (idx, rule) in rules.rules.iter().enumerate() {
        if !rule.has_condition() {
            warn!(
                rule_index = idx,
                classification = %rule.classification,
                "rule has neither 'contains' nor 'equals' and will never match"
            );
        }
    }
    Ok(rules)
}

/// Load the ordered rule set from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a rule document.
pub fn load_rules(path: &Path) -> Result<RuleSet> {
    let json = std::fs::read_to_string(path).map_err(|e| ClassifyError::RulesRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rules = parse_rules(&json, path)?;
    debug!(path = %path.display(), rule_count = rules.len(), "loaded classification rules");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = load_rules(Path::new("/no/such/rules.json")).unwrap_err();
        assert!(matches!(err, ClassifyError::RulesRead { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_rules("{\"rules\": [", Path::new("rules.json")).unwrap_err();
        assert!(matches!(err, ClassifyError::RulesParse { .. }));
        assert!(err.to_string().starts_with("invalid rules file rules.json"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classification_rules.json");
        std::fs::write(
            &path,
            r#"{"rules": [{"field": "TYPE", "classification": "t", "equals": ["x"]}]}"#,
        )
        .unwrap();
        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.len(), 1);
    }
}
