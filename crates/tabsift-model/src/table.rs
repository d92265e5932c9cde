use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};

/// A single worksheet cell, typed the way it is written back to disk.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// A date or timestamp; date-only cells carry midnight.
    DateTime(NaiveDateTime),
    Missing,
}

impl CellValue {
    /// Text cell, or `Missing` for blank input.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Missing
        } else {
            Self::Text(value)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Missing, or text that is only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Whether a date value has no time-of-day part.
    pub fn is_date_only(value: &NaiveDateTime) -> bool {
        value.time() == NaiveTime::MIN
    }
}

/// Text a reader sees in the cell: numbers without a trailing `.0`,
/// booleans as `TRUE`/`FALSE`, dates as ISO 8601, missing as empty.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(v) => write!(f, "{v}"),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
            Self::DateTime(dt) if Self::is_date_only(dt) => write!(f, "{}", dt.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Self::Missing => Ok(()),
        }
    }
}

/// A named worksheet as a grid of cells, header row included.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn display_matches_sheet_text() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.5");
        assert_eq!(CellValue::Bool(false).to_string(), "FALSE");
        assert_eq!(CellValue::Missing.to_string(), "");
        assert_eq!(
            CellValue::DateTime(date(2024, 3, 15).and_hms_opt(0, 0, 0).unwrap()).to_string(),
            "2024-03-15"
        );
        assert_eq!(
            CellValue::DateTime(date(2024, 3, 15).and_hms_opt(9, 30, 5).unwrap()).to_string(),
            "2024-03-15 09:30:05"
        );
    }

    #[test]
    fn whitespace_text_is_blank() {
        assert!(CellValue::Text(" \t".to_string()).is_blank());
        assert!(CellValue::Missing.is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert_eq!(CellValue::text("  "), CellValue::Missing);
    }
}
