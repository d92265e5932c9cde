use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome of one run, as shown in the summary.
#[derive(Debug)]
pub struct RunResult {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub files: Vec<FileSummary>,
    pub combined: Option<CombineSummary>,
    pub classification: Option<ClassificationSummary>,
    pub errors: Vec<String>,
}

impl RunResult {
    pub fn processed_count(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_none()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.len() - self.processed_count()
    }
}

#[derive(Debug)]
pub struct FileSummary {
    pub source: PathBuf,
    /// Cleaned copy; `None` when the file failed.
    pub output: Option<PathBuf>,
    pub rows: usize,
    pub columns: usize,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct CombineSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub target_column: String,
}

#[derive(Debug)]
pub struct ClassificationSummary {
    pub sheet_name: String,
    pub distinct_values: usize,
    /// Distinct values per classification label.
    pub label_counts: BTreeMap<String, usize>,
}
