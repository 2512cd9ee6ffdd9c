//! Comparison orchestrator - resolves inputs, compares, renders and writes

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::diff::{Comparator, Comparison, Summary, DEFAULT_THRESHOLD};
use super::discovery::{find_baseline_results, find_latest_results};
use crate::error::CompareError;
use crate::metadata::{load_metadata, RunMetadata};
use crate::parser::{Measurements, Source};
use crate::report::{self, ReportFormat, ReportInput};

/// Options for a comparison run
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Directory containing result files and metadata
    pub results_dir: PathBuf,
    /// Run identifier of the latest run (default: newest files)
    pub latest: Option<String>,
    /// Run identifier of the baseline run (default: pinned or second newest)
    pub baseline: Option<String>,
    /// Output format
    pub format: ReportFormat,
    /// Regression threshold in percent
    pub threshold: f64,
    /// Report path (default: auto-generated inside the results directory)
    pub output: Option<PathBuf>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("benchmark-results"),
            latest: None,
            baseline: None,
            format: ReportFormat::Markdown,
            threshold: DEFAULT_THRESHOLD,
            output: None,
        }
    }
}

/// Result files chosen for one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPaths {
    pub latest: Option<PathBuf>,
    pub baseline: Option<PathBuf>,
}

/// What a completed comparison produced.
#[derive(Debug, Clone)]
pub struct CompareOutcome {
    pub report_path: PathBuf,
    pub summary: Summary,
    pub rust: Comparison,
    pub swift: Comparison,
}

impl CompareOutcome {
    pub fn has_regressions(&self) -> bool {
        self.summary.has_regressions()
    }

    /// Print colorized summary to terminal.
    pub fn print_summary(&self) {
        println!(
            "  {} benchmarks | {} | {} | {} unchanged",
            self.summary.total.to_string().white().bold(),
            format!("{} improvements", self.summary.improvements).green(),
            format!("{} regressions", self.summary.regressions).red(),
            self.summary.unchanged
        );

        let regressions = self
            .rust
            .records
            .iter()
            .chain(self.swift.records.iter())
            .filter(|c| c.is_regression());
        for c in regressions {
            println!(
                "  {} {} {}",
                "✗".red(),
                c.name,
                format!("+{:.2}%", c.change_percent).red().bold()
            );
        }
    }
}

/// Orchestrator for comparison runs
pub struct Orchestrator {
    options: CompareOptions,
    comparator: Comparator,
}

impl Orchestrator {
    pub fn new(options: CompareOptions) -> Self {
        let comparator = Comparator::new(options.threshold);
        Self {
            options,
            comparator,
        }
    }

    pub fn run(&self) -> Result<CompareOutcome> {
        let dir = &self.options.results_dir;
        if !dir.is_dir() {
            return Err(CompareError::ResultsDirNotFound(dir.clone()).into());
        }

        let rust_paths = self.resolve(Source::Rust)?;
        let swift_paths = self.resolve(Source::Swift)?;

        let rust_latest = load(Source::Rust, rust_paths.latest.as_deref());
        let rust_baseline = load(Source::Rust, rust_paths.baseline.as_deref());
        let swift_latest = load(Source::Swift, swift_paths.latest.as_deref());
        let swift_baseline = load(Source::Swift, swift_paths.baseline.as_deref());

        if rust_latest.is_empty() && swift_latest.is_empty() {
            return Err(CompareError::NoResults.into());
        }

        let rust = self.compare(Source::Rust, &rust_baseline, &rust_latest);
        let swift = self.compare(Source::Swift, &swift_baseline, &swift_latest);

        let metadata = load_metadata(dir, self.options.latest.as_deref());
        let baseline_metadata = self
            .options
            .baseline
            .as_deref()
            .map(|id| load_metadata(dir, Some(id)));

        let input = ReportInput::new(&rust.records, &swift.records, &metadata)
            .with_baseline_metadata(baseline_metadata.as_ref());
        let summary = input.summary();
        let renderer = self.options.format.renderer();
        let rendered = renderer
            .render(&input)
            .context("Failed to render comparison report")?;

        let report_path = self
            .options
            .output
            .clone()
            .unwrap_or_else(|| default_report_path(dir, &metadata, renderer.extension()));
        report::save(&rendered, &report_path)?;

        println!(
            "{} Report generated: {}",
            "✓".green(),
            report_path.display().to_string().dimmed()
        );

        Ok(CompareOutcome {
            report_path,
            summary,
            rust,
            swift,
        })
    }

    /// Result files to compare for `source`.
    pub fn resolve(&self, source: Source) -> Result<ResolvedPaths> {
        let dir = &self.options.results_dir;
        let prefix = source.key();
        let explicit = |id: &str| dir.join(format!("{}-{}.{}", prefix, id, source.run_extension()));

        let latest = match self.options.latest.as_deref() {
            Some(id) => Some(explicit(id)),
            None => find_latest_results(dir, prefix)?,
        };
        let baseline = match self.options.baseline.as_deref() {
            Some(id) => Some(explicit(id)),
            None => find_baseline_results(dir, prefix)?,
        };

        tracing::debug!(
            %source,
            latest = ?latest,
            baseline = ?baseline,
            "resolved result files"
        );
        Ok(ResolvedPaths { latest, baseline })
    }

    fn compare(
        &self,
        source: Source,
        baseline: &Measurements,
        latest: &Measurements,
    ) -> Comparison {
        let comparison = self.comparator.compare(baseline, latest);

        for name in &comparison.incompatible {
            eprintln!(
                "{} {} benchmark {} changed units between runs; not compared",
                "Warning".yellow(),
                source,
                name
            );
        }
        tracing::debug!(
            %source,
            compared = comparison.records.len(),
            added = ?comparison.added,
            removed = ?comparison.removed,
            "compared runs"
        );

        comparison
    }
}

/// Parse one result file, reporting any warnings. A missing file is empty.
fn load(source: Source, path: Option<&Path>) -> Measurements {
    let Some(path) = path.filter(|p| p.exists()) else {
        return Measurements::new();
    };

    let output = source.parser().parse_file(path);
    for warning in &output.warnings {
        eprintln!("{} {}", "Warning".yellow(), warning);
    }
    tracing::debug!(
        %source,
        path = %path.display(),
        count = output.measurements.len(),
        "parsed results"
    );

    output.measurements
}

/// `<dir>/report-<timestamp>-<commit>.<ext>`
fn default_report_path(dir: &Path, metadata: &RunMetadata, extension: &str) -> PathBuf {
    let timestamp = metadata
        .timestamp()
        .unwrap_or_else(|| Local::now().format("%Y%m%d-%H%M%S").to_string());
    dir.join(format!(
        "report-{}-{}.{}",
        timestamp,
        metadata.commit_hash(),
        extension
    ))
}
