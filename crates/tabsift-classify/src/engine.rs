//! Rule engine for classifying distinct values.
//!
//! Rules are compiled once (needles trimmed and lower-cased) and evaluated
//! in declared order against a case-insensitive record of the aggregated
//! classification row. The first rule whose field resolves to a non-blank
//! value and whose condition holds decides the label.

use std::collections::HashSet;

use tabsift_model::{
    CaseInsensitiveMap, ClassificationRow, OTHER_CLASSIFICATION, Rule, RuleField, RuleSet,
};

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// A rule with its match operands pre-normalized.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub field: RuleField,
    pub classification: String,
    contains: Option<String>,
    equals: Option<HashSet<String>>,
}

impl CompiledRule {
    pub fn new(rule: &Rule) -> Self {
        Self {
            field: rule.field.clone(),
            classification: rule.classification.clone(),
            contains: rule.contains.as_deref().map(normalize),
            equals: rule
                .equals
                .as_ref()
                .map(|values| values.iter().map(|v| normalize(v)).collect()),
        }
    }

    /// Tests the rule's condition against an already resolved value.
    ///
    /// `contains` is checked before `equals`; either one matching is enough.
    pub fn matches(&self, value: &str) -> bool {
        let value = normalize(value);
        if let Some(needle) = &self.contains
            && value.contains(needle.as_str())
        {
            return true;
        }
        if let Some(allowed) = &self.equals
            && allowed.contains(&value)
        {
            return true;
        }
        false
    }

    /// Value this rule tests, or `None` when the field is absent or blank.
    fn resolve<'a>(
        &self,
        target_column: &'a str,
        record: &'a CaseInsensitiveMap<String>,
    ) -> Option<&'a str> {
        let value = match &self.field {
            RuleField::ColumnName => target_column,
            RuleField::Column(name) => record.get(name)?.as_str(),
        };
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Fields a rule can name, keyed case-insensitively.
///
/// The analyzed column's own name and `VALUE` map to the distinct value;
/// `COUNT`, `FILES`/`FILE_NAME`, `COMMENT` and `TYPE` map to the aggregates.
pub fn classification_record(
    target_column: &str,
    row: &ClassificationRow,
) -> CaseInsensitiveMap<String> {
    let mut record = CaseInsensitiveMap::new();
    let files = row.files_joined();
    record.insert("VALUE", row.value.clone());
    record.insert("COUNT", row.count.to_string());
    record.insert("FILES", files.clone());
    record.insert("FILE_NAME", files);
    record.insert("COMMENT", row.comments_joined());
    record.insert("TYPE", row.types_joined());
    record.insert(target_column, row.value.clone());
    record
}

/// Ordered, first-match-wins rule evaluation.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            rules: rules.rules.iter().map(CompiledRule::new).collect(),
        }
    }

    /// Label for `record`, or [`OTHER_CLASSIFICATION`] when no rule matches.
    pub fn classify<'a>(
        &'a self,
        target_column: &str,
        record: &CaseInsensitiveMap<String>,
    ) -> &'a str {
        self.rules
            .iter()
            .find(|rule| {
                rule.resolve(target_column, record)
                    .is_some_and(|value| rule.matches(value))
            })
            .map_or(OTHER_CLASSIFICATION, |rule| rule.classification.as_str())
    }

    /// Label for an aggregated classification row.
    pub fn classify_row<'a>(&'a self, target_column: &str, row: &ClassificationRow) -> &'a str {
        let record = classification_record(target_column, row);
        self.classify(target_column, &record)
    }
}
