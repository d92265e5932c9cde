//! Spreadsheet discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{IngestError, Result};

/// Prefix Office uses for lock files next to an open workbook.
const LOCK_FILE_PREFIX: &str = "~$";

/// Checks whether a path names an `.xlsx` workbook (case-insensitive),
/// ignoring Office lock files.
pub fn is_spreadsheet_file(path: &Path) -> bool {
    let is_xlsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    let is_lock = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(LOCK_FILE_PREFIX));
    is_xlsx && !is_lock
}

/// Recursively lists all spreadsheets under `dir`.
///
/// Returns files sorted by path. Unreadable subdirectories are logged and
/// skipped.
pub fn list_spreadsheet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(error = %error, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if is_spreadsheet_file(path) {
            files.push(path.to_path_buf());
        } else {
            debug!(path = %path.display(), "ignoring non-spreadsheet file");
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_spreadsheet_file() {
        assert!(is_spreadsheet_file(Path::new("models/orders.xlsx")));
        assert!(is_spreadsheet_file(Path::new("models/ORDERS.XLSX")));
        assert!(!is_spreadsheet_file(Path::new("models/orders.csv")));
        assert!(!is_spreadsheet_file(Path::new("models/~$orders.xlsx")));
        assert!(!is_spreadsheet_file(Path::new("models/xlsx")));
    }

    #[test]
    fn test_missing_directory() {
        let err = list_spreadsheet_files(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
    }
}
