//! Shared utilities for tabsift crates.
//!
//! This crate provides the Polars DataFrame helpers used across the
//! workspace: value-to-string conversion and building or reading frames
//! whose columns are nullable strings.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use crate::polars::{
    any_to_string, any_to_string_non_empty, column_strings, format_numeric, string_frame,
};
