//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use tabsift_model::{DEFAULT_OUTPUT_DIR, DEFAULT_RULES_PATH, DEFAULT_SHEET_NAME, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "tabsift",
    version,
    about = "Clean, combine and classify a tree of spreadsheets",
    long_about = "Clean every .xlsx file under a directory, combine the cleaned tables into\n\
                  one workbook and classify the distinct values of one column with an\n\
                  ordered JSON rule set."
)]
pub struct Cli {
    /// Directory searched recursively for .xlsx files.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Destination for cleaned copies and the combined workbook.
    #[arg(long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Classification rules (JSON).
    #[arg(long = "rules", value_name = "PATH", default_value = DEFAULT_RULES_PATH)]
    pub rules: PathBuf,

    /// Column to classify (default: first column ending in `_id`, else `COLUMN NAME`).
    #[arg(long = "target-column", value_name = "NAME")]
    pub target_column: Option<String>,

    /// Name of the classification sheet added to the combined workbook.
    #[arg(long = "sheet-name", value_name = "NAME", default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,

    /// Title rows above the header row to skip in every source sheet.
    #[arg(long = "title-rows", value_name = "N", default_value_t = 0)]
    pub title_rows: usize,

    /// Do not add the per-row `COUNT <column>` occurrence column.
    #[arg(long = "no-count-column")]
    pub no_count_column: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(&self.source_dir)
            .with_output_dir(&self.output_dir)
            .with_rules_path(&self.rules)
            .with_target_column(self.target_column.clone())
            .with_sheet_name(&self.sheet_name)
            .with_title_rows(self.title_rows)
            .with_count_column(!self.no_count_column)
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_pipeline_defaults() {
        let cli = Cli::try_parse_from(["tabsift", "models"]).expect("parse");
        assert_eq!(cli.pipeline_config(), PipelineConfig::new("models"));
    }

    #[test]
    fn flags_reach_the_pipeline_config() {
        let cli = Cli::try_parse_from([
            "tabsift",
            "models",
            "--output-dir",
            "out",
            "--rules",
            "rules.json",
            "--target-column",
            "CODE",
            "--sheet-name",
            "Labels",
            "--title-rows",
            "2",
            "--no-count-column",
        ])
        .expect("parse");
        let config = cli.pipeline_config();
        assert_eq!(config.output_dir, Path::new("out"));
        assert_eq!(config.rules_path, Path::new("rules.json"));
        assert_eq!(config.target_column.as_deref(), Some("CODE"));
        assert_eq!(config.sheet_name, "Labels");
        assert_eq!(config.title_rows, 2);
        assert!(!config.count_column);
    }

    #[test]
    fn source_dir_is_required() {
        assert!(Cli::try_parse_from(["tabsift"]).is_err());
    }
}
