//! Run pipeline with explicit stages.
//!
//! 1. **Collect**: discover spreadsheets, clean each one, write its
//!    `<stem>_cleared.xlsx` copy
//! 2. **Combine**: concatenate the cleaned tables, pick the target column,
//!    write `combined_file.xlsx`
//! 3. **Classify**: label every distinct target value and add the
//!    classification sheet to the combined workbook
//!
//! Per-file failures and classification failures are logged and recorded;
//! only a source directory that cannot be walked stops the run.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, error, info, info_span, warn};

use tabsift_classify::{
    RuleEngine, classification_frame, classify_frame, load_rules, occurrence_column_name,
    occurrence_counts, select_target_column,
};
use tabsift_ingest::{IngestOptions, SheetTable, list_spreadsheet_files, read_frame, read_sheet_table};
use tabsift_model::{
    CaseInsensitiveLookup, CellValue, DATA_SHEET_NAME, PipelineConfig, source_stem,
};
use tabsift_output::{frame_to_grid, replace_sheet, write_workbook};

use crate::types::{ClassificationSummary, CombineSummary, FileSummary, RunResult};

// ============================================================================
// Stage 1: Collect
// ============================================================================

/// Result of the collect stage.
#[derive(Debug)]
pub struct CollectResult {
    /// Cleaned tables, tagged with their `file_name`, in discovery order.
    pub tables: Vec<SheetTable>,
    pub files: Vec<FileSummary>,
    pub errors: Vec<String>,
}

/// Cleans every spreadsheet under the source directory.
///
/// A file that cannot be read, cleaned or written is logged and skipped.
pub fn collect(config: &PipelineConfig) -> Result<CollectResult> {
    let sources = list_spreadsheet_files(&config.source_dir).context("list spreadsheet files")?;
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("create output directory {}", config.output_dir.display())
    })?;
    let options = IngestOptions::with_title_rows(config.title_rows);
    let output_root = config.output_dir.canonicalize().ok();

    let mut tables = Vec::new();
    let mut files = Vec::with_capacity(sources.len());
    let mut errors = Vec::new();
    let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();
    for source in sources {
        if is_under(&source, output_root.as_deref()) {
            debug!(source = %source.display(), "skipping file inside the output directory");
            continue;
        }
        match clean_file(&source, config, &options) {
            Ok((table, output)) => {
                debug!(
                    source = %source.display(),
                    output = %output.display(),
                    rows = table.height(),
                    columns = table.width(),
                    "cleaned file"
                );
                if let Some(earlier) = record_output(&mut written, &output, &source) {
                    warn!(
                        source = %source.display(),
                        earlier = %earlier.display(),
                        output = %output.display(),
                        "cleaned copy overwrote the copy of a file with the same name"
                    );
                }
                files.push(FileSummary {
                    rows: table.height(),
                    columns: table.width(),
                    source,
                    output: Some(output),
                    error: None,
                });
                tables.push(table);
            }
            Err(err) => {
                let message = format!("{err:#}");
                error!(source = %source.display(), error = %message, "failed to process file");
                errors.push(format!("{}: {message}", source.display()));
                files.push(FileSummary {
                    source,
                    output: None,
                    rows: 0,
                    columns: 0,
                    error: Some(message),
                });
            }
        }
    }
    Ok(CollectResult {
        tables,
        files,
        errors,
    })
}

/// Remembers that `source` was written to `output`, returning the source
/// previously written there.
fn record_output(
    written: &mut HashMap<PathBuf, PathBuf>,
    output: &Path,
    source: &Path,
) -> Option<PathBuf> {
    written.insert(output.to_path_buf(), source.to_path_buf())
}

/// Whether `path` lies inside `root` (an output directory nested in the
/// source tree).
fn is_under(path: &Path, root: Option<&Path>) -> bool {
    match (root, path.canonicalize()) {
        (Some(root), Ok(path)) => path.starts_with(root),
        _ => false,
    }
}

fn clean_file(
    source: &Path,
    config: &PipelineConfig,
    options: &IngestOptions,
) -> Result<(SheetTable, PathBuf)> {
    let table = read_sheet_table(source, options)
        .context("read worksheet")?
        .with_file_name(&source_stem(source));
    let output = config.cleared_path(source);
    write_workbook(&output, &[table.to_grid(DATA_SHEET_NAME)])
        .with_context(|| format!("write {}", output.display()))?;
    Ok((table, output))
}

// ============================================================================
// Stage 2: Combine
// ============================================================================

/// Concatenates the cleaned tables and writes the combined workbook.
///
/// Returns `None` when there is nothing to combine.
pub fn combine(tables: &[SheetTable], config: &PipelineConfig) -> Result<Option<CombineSummary>> {
    if tables.is_empty() {
        warn!(
            source_dir = %config.source_dir.display(),
            "no spreadsheets were collected; nothing to combine"
        );
        return Ok(None);
    }
    let mut combined = SheetTable::concat(tables);
    let target_column = match &config.target_column {
        Some(column) => column.clone(),
        None => select_target_column(&combined.headers),
    };
    info!(target_column = %target_column, "selected target column");
    if config.count_column {
        add_occurrence_column(&mut combined, &target_column);
    }

    let path = config.combined_path();
    write_workbook(&path, &[combined.to_grid(DATA_SHEET_NAME)])
        .with_context(|| format!("write {}", path.display()))?;
    Ok(Some(CombineSummary {
        rows: combined.height(),
        columns: combined.width(),
        path,
        target_column,
    }))
}

/// Appends `COUNT <target>`; left empty when the target column is absent.
fn add_occurrence_column(table: &mut SheetTable, target_column: &str) {
    let lookup = CaseInsensitiveLookup::from_names(table.headers.iter().map(String::as_str));
    let counts = match lookup
        .resolve(target_column)
        .and_then(|column| table.column_text(column))
    {
        Some(targets) => occurrence_counts(&targets)
            .into_iter()
            .map(|count| count.map_or(CellValue::Missing, |n| CellValue::Number(n as f64)))
            .collect(),
        None => {
            warn!(column = %target_column, "target column not found; occurrence column left empty");
            Vec::new()
        }
    };
    table.set_column(&occurrence_column_name(target_column), counts);
}

// ============================================================================
// Stage 3: Classify
// ============================================================================

/// Classifies the target column of the combined workbook and writes the
/// result as the configured sheet of that workbook.
pub fn classify(config: &PipelineConfig, combined: &CombineSummary) -> Result<ClassificationSummary> {
    let rules = load_rules(&config.rules_path).context("load classification rules")?;
    let engine = RuleEngine::new(&rules);
    let frame = read_frame(&combined.path, &IngestOptions::default())
        .context("read combined workbook")?;
    let rows = classify_frame(&frame, &combined.target_column, &engine)
        .context("classify distinct values")?;
    let sheet = classification_frame(&rows).context("build classification table")?;
    replace_sheet(&combined.path, frame_to_grid(&sheet, &config.sheet_name))
        .with_context(|| format!("write sheet '{}'", config.sheet_name))?;

    let mut label_counts = BTreeMap::new();
    for row in &rows {
        *label_counts.entry(row.classification.clone()).or_insert(0) += 1;
    }
    Ok(ClassificationSummary {
        sheet_name: config.sheet_name.clone(),
        distinct_values: rows.len(),
        label_counts,
    })
}

// ============================================================================
// Run
// ============================================================================

/// Runs the three stages in order.
///
/// # Errors
///
/// Fails only when the source directory cannot be walked or the output
/// directory cannot be created. Everything later is recorded in
/// [`RunResult::errors`].
pub fn run(config: &PipelineConfig) -> Result<RunResult> {
    let run_span = info_span!("run", source_dir = %config.source_dir.display());
    let _run_guard = run_span.enter();

    let collect_start = Instant::now();
    let CollectResult {
        tables,
        files,
        mut errors,
    } = info_span!("collect").in_scope(|| collect(config))?;
    info!(
        file_count = files.len(),
        failed = errors.len(),
        duration_ms = collect_start.elapsed().as_millis(),
        "collect complete"
    );

    let combine_start = Instant::now();
    let combined = match info_span!("combine").in_scope(|| combine(&tables, config)) {
        Ok(combined) => combined,
        Err(err) => {
            error!(error = %format!("{err:#}"), "failed to combine tables");
            errors.push(format!("combine: {err:#}"));
            None
        }
    };
    if let Some(summary) = &combined {
        info!(
            path = %summary.path.display(),
            rows = summary.rows,
            columns = summary.columns,
            duration_ms = combine_start.elapsed().as_millis(),
            "combine complete"
        );
    }

    let classification = combined.as_ref().and_then(|summary| {
        let classify_start = Instant::now();
        let span = info_span!("classify", target_column = %summary.target_column);
        match span.in_scope(|| classify(config, summary)) {
            Ok(result) => {
                info!(
                    sheet = %result.sheet_name,
                    distinct_values = result.distinct_values,
                    duration_ms = classify_start.elapsed().as_millis(),
                    "classify complete"
                );
                Some(result)
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "classification aborted");
                errors.push(format!("classify: {err:#}"));
                None
            }
        }
    });

    Ok(RunResult {
        source_dir: config.source_dir.clone(),
        output_dir: config.output_dir.clone(),
        files,
        combined,
        classification,
        errors,
    })
}
