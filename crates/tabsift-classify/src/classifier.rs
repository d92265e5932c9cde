//! Grouping a combined table by the distinct values of one column.

use std::collections::{BTreeSet, HashMap};

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use tabsift_common::column_strings;
use tabsift_model::{CaseInsensitiveLookup, ClassificationRow, FILE_NAME_COLUMN};

use crate::engine::RuleEngine;
use crate::error::{ClassifyError, Result};

const COMMENT_COLUMN: &str = "COMMENT";
const TYPE_COLUMN: &str = "TYPE";

/// Column headers of the classification sheet, in order.
pub const CLASSIFICATION_HEADERS: [&str; 6] = [
    "Value",
    "Count",
    "Source_Files",
    COMMENT_COLUMN,
    TYPE_COLUMN,
    "Classification",
];

#[derive(Debug)]
struct ValueGroup {
    value: String,
    count: usize,
    files: BTreeSet<String>,
    comments: BTreeSet<String>,
    types: BTreeSet<String>,
}

fn optional_column(
    df: &DataFrame,
    lookup: &CaseInsensitiveLookup,
    name: &str,
) -> Option<Vec<Option<String>>> {
    lookup
        .resolve(name)
        .and_then(|column| column_strings(df, column))
}

fn collect(set: &mut BTreeSet<String>, column: Option<&Vec<Option<String>>>, idx: usize) {
    if let Some(value) = column.and_then(|values| values[idx].as_ref()) {
        set.insert(value.clone());
    }
}

/// Classifies every distinct value of `target_column`.
///
/// Rows come back sorted by descending count; values with equal counts
/// keep the order in which they first appear. Blank target cells do not
/// form a value.
///
/// # Errors
///
/// Returns [`ClassifyError::ColumnNotFound`] when the table has no column
/// matching `target_column` case-insensitively.
pub fn classify_frame(
    df: &DataFrame,
    target_column: &str,
    engine: &RuleEngine,
) -> Result<Vec<ClassificationRow>> {
    let lookup = CaseInsensitiveLookup::from_names(df.get_column_names_owned());
    let column = lookup
        .resolve(target_column)
        .ok_or_else(|| ClassifyError::ColumnNotFound {
            column: target_column.to_string(),
        })?;
    let targets = column_strings(df, column).ok_or_else(|| ClassifyError::ColumnNotFound {
        column: target_column.to_string(),
    })?;
    let files = optional_column(df, &lookup, FILE_NAME_COLUMN);
    let comments = optional_column(df, &lookup, COMMENT_COLUMN);
    let types = optional_column(df, &lookup, TYPE_COLUMN);

    let mut groups: Vec<ValueGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut blank = 0usize;
    for (idx, target) in targets.iter().enumerate() {
        let Some(value) = target else {
            blank += 1;
            continue;
        };
        let slot = *index.entry(value.clone()).or_insert_with(|| {
            groups.push(ValueGroup {
                value: value.clone(),
                count: 0,
                files: BTreeSet::new(),
                comments: BTreeSet::new(),
                types: BTreeSet::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.count += 1;
        collect(&mut group.files, files.as_ref(), idx);
        collect(&mut group.comments, comments.as_ref(), idx);
        collect(&mut group.types, types.as_ref(), idx);
    }
    if blank > 0 {
        debug!(column = %column, blank_rows = blank, "skipped rows with a blank target value");
    }

    let mut rows: Vec<ClassificationRow> = groups
        .into_iter()
        .map(|group| {
            let mut row = ClassificationRow {
                value: group.value,
                count: group.count,
                files: group.files.into_iter().collect(),
                comments: group.comments.into_iter().collect(),
                types: group.types.into_iter().collect(),
                classification: String::new(),
            };
            row.classification = engine.classify_row(column, &row).to_string();
            row
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(rows)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Builds the classification sheet as a DataFrame.
pub fn classification_frame(rows: &[ClassificationRow]) -> Result<DataFrame> {
    let [value, count, files, comments, types, classification] = CLASSIFICATION_HEADERS;
    let counts: Vec<i64> = rows
        .iter()
        .map(|row| i64::try_from(row.count).unwrap_or(i64::MAX))
        .collect();
    let text = |name: &str, values: Vec<Option<String>>| -> Column {
        Series::new(name.into(), values).into_column()
    };
    let columns = vec![
        text(value, rows.iter().map(|r| Some(r.value.clone())).collect()),
        Series::new(count.into(), counts).into_column(),
        text(files, rows.iter().map(|r| non_empty(r.files_joined())).collect()),
        text(
            comments,
            rows.iter().map(|r| non_empty(r.comments_joined())).collect(),
        ),
        text(types, rows.iter().map(|r| non_empty(r.types_joined())).collect()),
        text(
            classification,
            rows.iter().map(|r| Some(r.classification.clone())).collect(),
        ),
    ];
    Ok(DataFrame::new(columns)?)
}

/// Name of the per-row occurrence column for `target_column`.
pub fn occurrence_column_name(target_column: &str) -> String {
    format!("COUNT {}", target_column.trim())
}

/// For each row, how many rows share its target value.
///
/// Blank targets get `None`.
pub fn occurrence_counts(targets: &[Option<String>]) -> Vec<Option<i64>> {
    let mut tally: HashMap<&str, i64> = HashMap::new();
    for value in targets.iter().flatten() {
        *tally.entry(value.as_str()).or_insert(0) += 1;
    }
    targets
        .iter()
        .map(|value| value.as_deref().and_then(|v| tally.get(v).copied()))
        .collect()
}
