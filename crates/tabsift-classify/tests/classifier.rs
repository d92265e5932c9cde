//! Integration tests for grouping and classifying a combined table.

use polars::prelude::{AnyValue, DataFrame};

use tabsift_classify::{
    ClassifyError, RuleEngine, classification_frame, classify_frame, occurrence_column_name,
    occurrence_counts, parse_rules,
};
use tabsift_common::{column_strings, string_frame};
use tabsift_model::{ClassificationRow, RuleSet};

fn test_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    string_frame(columns.into_iter().map(|(name, values)| {
        (
            name,
            values
                .into_iter()
                .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                .collect::<Vec<_>>(),
        )
    }))
    .unwrap()
}

fn rules(json: &str) -> RuleSet {
    parse_rules(json, std::path::Path::new("rules.json")).unwrap()
}

fn render(rows: &[ClassificationRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{} | {} | {} | {} | {} | {}",
                row.value,
                row.count,
                row.files_joined(),
                row.comments_joined(),
                row.types_joined(),
                row.classification
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Two source tables stacked: the second has `COMMENT` but no `TYPE`.
fn combined_scenario() -> DataFrame {
    test_df(vec![
        ("COLUMN_ID", vec!["A", "B", "A", "A"]),
        ("TYPE", vec!["x", "y", "x", ""]),
        ("file_name", vec!["first", "first", "first", "second"]),
        ("COMMENT", vec!["", "", "", "z"]),
    ])
}

#[test]
fn end_to_end_scenario() {
    let combined = combined_scenario();
    let engine = RuleEngine::new(&rules(
        r#"{"rules": [{"field": "COLUMN_ID", "equals": ["a"], "classification": "alpha"}]}"#,
    ));

    let rows = classify_frame(&combined, "COLUMN_ID", &engine).unwrap();

    insta::assert_snapshot!(render(&rows), @r"
    A | 3 | first, second | z | x | alpha
    B | 1 | first |  | y | other
    ");
}

#[test]
fn first_matching_rule_wins() {
    let df = test_df(vec![("CODE", vec!["apple", "apricot", "banana", "cherry"])]);
    let engine = RuleEngine::new(&rules(
        r#"{"rules": [
            {"field": "CODE", "contains": "apr", "classification": "first"},
            {"field": "CODE", "contains": "ap", "classification": "second"},
            {"field": "CODE", "equals": ["banana", "apricot"], "classification": "third"}
        ]}"#,
    ));

    let rows = classify_frame(&df, "CODE", &engine).unwrap();
    let labels: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.value.as_str(), r.classification.as_str()))
        .collect();

    assert_eq!(
        labels,
        vec![
            ("apple", "second"),
            ("apricot", "first"),
            ("banana", "third"),
            ("cherry", "other"),
        ]
    );
}

#[test]
fn sentinel_rule_labels_every_value_alike() {
    let df = test_df(vec![("model_id", vec!["m1", "m2", "m2"])]);
    let engine = RuleEngine::new(&rules(
        r#"{"rules": [{"field": "$column", "contains": "MODEL", "classification": "models"}]}"#,
    ));

    let rows = classify_frame(&df, "model_id", &engine).unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.classification == "models"));
}

#[test]
fn ties_keep_encounter_order() {
    let df = test_df(vec![("ID", vec!["c", "a", "b", "a", "c", "d"])]);
    let engine = RuleEngine::new(&RuleSet::default());

    let rows = classify_frame(&df, "ID", &engine).unwrap();
    let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();

    assert_eq!(values, vec!["c", "a", "b", "d"]);
}

#[test]
fn target_and_aux_columns_resolve_case_insensitively() {
    let df = test_df(vec![
        ("Column_Id", vec!["A", "A", ""]),
        ("Comment", vec!["later", "first", "orphan"]),
        ("FILE_NAME", vec!["f", "f", "f"]),
    ]);
    let engine = RuleEngine::new(&RuleSet::default());

    let rows = classify_frame(&df, "column_id", &engine).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[0].comments, vec!["first", "later"]);
    assert_eq!(rows[0].files, vec!["f"]);
    assert!(rows[0].types.is_empty());
}

#[test]
fn missing_target_column_is_an_error() {
    let df = test_df(vec![("OTHER", vec!["A"])]);
    let engine = RuleEngine::new(&RuleSet::default());

    let err = classify_frame(&df, "COLUMN NAME", &engine).unwrap_err();
    assert!(matches!(err, ClassifyError::ColumnNotFound { ref column } if column == "COLUMN NAME"));
}

#[test]
fn classification_frame_layout() {
    let rows = classify_frame(
        &combined_scenario(),
        "COLUMN_ID",
        &RuleEngine::new(&RuleSet::default()),
    )
    .unwrap();

    let df = classification_frame(&rows).unwrap();

    let names: Vec<String> = df
        .get_column_names_owned()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["Value", "Count", "Source_Files", "COMMENT", "TYPE", "Classification"]
    );
    assert_eq!(df.column("Count").unwrap().get(0).unwrap(), AnyValue::Int64(3));
    assert_eq!(
        column_strings(&df, "COMMENT").unwrap(),
        vec![Some("z".to_string()), None]
    );
}

#[test]
fn occurrence_counts_tally_target_values() {
    let targets = vec![
        Some("A".to_string()),
        Some("B".to_string()),
        Some("A".to_string()),
        None,
    ];

    assert_eq!(
        occurrence_counts(&targets),
        vec![Some(2), Some(1), Some(2), None]
    );
    assert_eq!(occurrence_column_name(" ID "), "COUNT ID");
}

#[test]
fn occurrence_counts_are_case_sensitive() {
    let targets = vec![Some("a".to_string()), Some("A".to_string())];
    assert_eq!(occurrence_counts(&targets), vec![Some(1), Some(1)]);
}
