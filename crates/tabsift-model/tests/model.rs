//! Tests for configuration defaults and rule parsing.

use std::path::{Path, PathBuf};

use tabsift_model::{
    COLUMN_NAME_SENTINEL, DEFAULT_SHEET_NAME, PipelineConfig, Rule, RuleField, RuleSet,
    source_stem,
};

#[test]
fn config_defaults_match_documented_layout() {
    let config = PipelineConfig::new("models");
    assert_eq!(config.output_dir, PathBuf::from("cleaned_models"));
    assert_eq!(config.rules_path, PathBuf::from("classification_rules.json"));
    assert_eq!(config.sheet_name, DEFAULT_SHEET_NAME);
    assert_eq!(config.title_rows, 0);
    assert!(config.count_column);
    assert!(config.target_column.is_none());
}

#[test]
fn derived_paths_live_in_output_dir() {
    let config = PipelineConfig::new("models").with_output_dir("out");
    assert_eq!(
        config.combined_path(),
        PathBuf::from("out").join("combined_file.xlsx")
    );
    assert_eq!(
        config.cleared_path(Path::new("models/nested/orders.xlsx")),
        PathBuf::from("out").join("orders_cleared.xlsx")
    );
}

#[test]
fn stem_keeps_inner_dots() {
    assert_eq!(source_stem(Path::new("a/b/orders.v2.xlsx")), "orders.v2");
    assert_eq!(source_stem(Path::new("orders.xlsx")), "orders");
    assert_eq!(source_stem(Path::new("")), "");
}

#[cfg(unix)]
#[test]
fn non_utf8_stem_names_tag_and_copy_alike() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let source = PathBuf::from(OsStr::from_bytes(b"models/ord\xffers.xlsx"));
    let stem = source_stem(&source);
    assert_eq!(stem, "ord\u{fffd}ers");
    let config = PipelineConfig::new("models").with_output_dir("out");
    assert_eq!(
        config.cleared_path(&source),
        PathBuf::from("out").join(format!("{stem}_cleared.xlsx"))
    );
}

#[test]
fn sentinel_field_is_case_insensitive() {
    assert_eq!(
        RuleField::from(" $COLUMN ".to_string()),
        RuleField::ColumnName
    );
    assert_eq!(
        RuleField::from("TYPE".to_string()),
        RuleField::Column("TYPE".to_string())
    );
}

#[test]
fn rule_without_condition_is_accepted() {
    let json = r#"{"rules": [{"field": "TYPE", "classification": "typed"}]}"#;
    let rules: RuleSet = serde_json::from_str(json).unwrap();
    assert_eq!(rules.len(), 1);
    assert!(!rules.rules[0].has_condition());
}

#[test]
fn sentinel_serializes_back_to_marker() {
    let rule = Rule {
        field: RuleField::ColumnName,
        classification: "ids".to_string(),
        contains: Some("_id".to_string()),
        equals: None,
    };
    let json = serde_json::to_value(&rule).unwrap();
    assert_eq!(json["field"], COLUMN_NAME_SENTINEL);
    assert!(json.get("equals").is_none());
}

#[test]
fn missing_classification_is_rejected() {
    let json = r#"{"rules": [{"field": "TYPE", "equals": ["a"]}]}"#;
    assert!(serde_json::from_str::<RuleSet>(json).is_err());
}
