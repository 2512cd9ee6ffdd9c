//! Benchmark run comparison
//!
//! This module provides:
//! - Result file discovery inside a results directory
//! - Baseline-vs-latest diffing with threshold classification
//! - Report generation and the `benchcmp compare` entry point

pub mod diff;
pub mod discovery;
mod orchestrator;

pub use diff::{compare_results, Comparator, Comparison, ComparisonRecord, Status, Summary};
pub use orchestrator::{CompareOptions, CompareOutcome, Orchestrator, ResolvedPaths};

use anyhow::Result;
use colored::Colorize;

/// Main entry point for the compare command
pub fn compare(options: CompareOptions) -> Result<CompareOutcome> {
    println!(
        "{} Comparing benchmark runs in {}",
        "⚡".yellow(),
        options.results_dir.display().to_string().cyan().bold()
    );

    let orchestrator = Orchestrator::new(options);
    let outcome = orchestrator.run()?;

    println!("\n{}", "═".repeat(60).dimmed());
    println!("{}", "COMPARISON RESULTS".green().bold());
    println!("{}", "═".repeat(60).dimmed());

    outcome.print_summary();

    if outcome.has_regressions() {
        println!(
            "\n{} {} regression(s) detected",
            "Warning:".yellow().bold(),
            outcome.summary.regressions
        );
    }

    Ok(outcome)
}
