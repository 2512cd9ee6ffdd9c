mod status;

pub use status::status;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io;
use std::path::PathBuf;

use crate::compare::diff::is_valid_threshold;
use crate::compare::{self, CompareOptions};
use crate::config::Config;
use crate::report::ReportFormat;

/// Exit status of a successful run that found regressions.
pub const EXIT_REGRESSIONS: i32 = 1;
/// Exit status when no report could be produced.
pub const EXIT_FAILURE: i32 = 2;

#[derive(Parser)]
#[command(
    name = "benchcmp",
    about = "Compare benchmark runs and report performance regressions",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare the latest run against a baseline and write a report
    Compare {
        /// Directory containing benchmark results (default: benchmark-results)
        #[arg(long)]
        results_dir: Option<PathBuf>,

        /// Run identifier (timestamp-commit) of the latest run
        #[arg(long)]
        latest: Option<String>,

        /// Run identifier (timestamp-commit) of the baseline run
        #[arg(long)]
        baseline: Option<String>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Regression threshold percentage (default: 5.0)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Output file path (default: auto-generated in the results directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configuration and the result files a comparison would use
    Status {
        /// Directory containing benchmark results
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Output format for comparison reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !is_valid_threshold(value) {
        return Err(format!(
            "threshold must be a non-negative percentage, got {}",
            s
        ));
    }
    Ok(value)
}

/// Load `.benchcmprc.json`, warning and falling back to defaults when invalid.
pub fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{} {}: {} (using defaults)",
                "Warning".yellow(),
                crate::config::CONFIG_FILE,
                e
            );
            Config::default()
        }
    }
}

/// Merge command-line values over configured defaults.
pub fn compare_options(
    config: &Config,
    results_dir: Option<PathBuf>,
    latest: Option<String>,
    baseline: Option<String>,
    format: Option<OutputFormat>,
    threshold: Option<f64>,
    output: Option<PathBuf>,
) -> CompareOptions {
    CompareOptions {
        results_dir: results_dir.unwrap_or_else(|| config.results_dir.clone()),
        latest,
        baseline,
        format: format.map(ReportFormat::from).unwrap_or(config.format),
        threshold: threshold.unwrap_or(config.threshold),
        output,
    }
}

/// Run the compare command and map its outcome to a process exit status.
pub fn compare(options: CompareOptions) -> Result<i32> {
    let outcome = compare::compare(options)?;
    Ok(if outcome.has_regressions() {
        EXIT_REGRESSIONS
    } else {
        0
    })
}

pub fn completions(shell: clap_complete::Shell) {
    clap_complete::generate(shell, &mut Cli::command(), "benchcmp", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_must_be_non_negative() {
        assert_eq!(parse_threshold("5"), Ok(5.0));
        assert_eq!(parse_threshold("0"), Ok(0.0));
        assert!(parse_threshold("-1").is_err());
        assert!(parse_threshold("abc").is_err());
        assert!(parse_threshold("NaN").is_err());
    }

    #[test]
    fn cli_values_override_config() {
        let config = Config {
            results_dir: PathBuf::from("configured"),
            threshold: 2.0,
            format: ReportFormat::Json,
        };

        let defaults = compare_options(&config, None, None, None, None, None, None);
        assert_eq!(defaults.results_dir, PathBuf::from("configured"));
        assert_eq!(defaults.threshold, 2.0);
        assert_eq!(defaults.format, ReportFormat::Json);

        let overridden = compare_options(
            &config,
            Some(PathBuf::from("cli")),
            Some("latest-id".to_string()),
            None,
            Some(OutputFormat::Markdown),
            Some(7.5),
            None,
        );
        assert_eq!(overridden.results_dir, PathBuf::from("cli"));
        assert_eq!(overridden.latest.as_deref(), Some("latest-id"));
        assert_eq!(overridden.threshold, 7.5);
        assert_eq!(overridden.format, ReportFormat::Markdown);
    }
}
