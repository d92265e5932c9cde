//! Classification rule definitions as read from the rules JSON document.

use serde::{Deserialize, Serialize};

/// Rule field value that stands for the analyzed column's own name.
pub const COLUMN_NAME_SENTINEL: &str = "$column";

/// What a rule tests: a column of the classification row, or the name of
/// the analyzed column itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleField {
    /// The sentinel: test the analyzed column's name.
    ColumnName,
    /// A literal column name, resolved case-insensitively.
    Column(String),
}

impl From<String> for RuleField {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case(COLUMN_NAME_SENTINEL) {
            Self::ColumnName
        } else {
            Self::Column(value)
        }
    }
}

impl From<RuleField> for String {
    fn from(field: RuleField) -> Self {
        match field {
            RuleField::ColumnName => COLUMN_NAME_SENTINEL.to_string(),
            RuleField::Column(name) => name,
        }
    }
}

/// A single classification rule.
///
/// `contains` and `equals` are both optional; a rule carrying neither never
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub field: RuleField,
    pub classification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<Vec<String>>,
}

impl Rule {
    pub fn has_condition(&self) -> bool {
        self.contains.is_some() || self.equals.is_some()
    }
}

/// Ordered rule list; the first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
