use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::compare::discovery::{find_baseline_results, find_latest_metadata, find_latest_results};
use crate::config::{Config, CONFIG_FILE};
use crate::metadata::load_metadata;
use crate::parser::Source;

pub fn status(results_dir: Option<PathBuf>, config: &Config) -> Result<()> {
    let config_exists = Path::new(CONFIG_FILE).exists();
    let dir = results_dir.unwrap_or_else(|| config.results_dir.clone());

    println!("{}", "benchcmp Status".cyan().bold());
    println!("{}", "=".repeat(40).dimmed());

    println!("\n{}", "Configuration:".yellow().bold());
    if config_exists {
        println!("  {} {} found", "✓".green(), CONFIG_FILE);
    } else {
        println!("  {} No {} (using defaults)", "!".yellow(), CONFIG_FILE);
    }
    println!("  Threshold: {}%", config.threshold);
    println!("  Format: {:?}", config.format);

    println!("\n{}", "Results:".yellow().bold());
    println!("  Path: {}", dir.display());
    if !dir.is_dir() {
        println!("  {} Results directory not found", "✗".red());
        println!();
        return Ok(());
    }

    for source in Source::ALL {
        let latest = find_latest_results(&dir, source.key())?;
        let baseline = find_baseline_results(&dir, source.key())?;
        println!("  {}:", source.title().white().bold());
        println!("    latest:   {}", describe(latest.as_deref()));
        println!("    baseline: {}", describe(baseline.as_deref()));
    }

    println!("\n{}", "Metadata:".yellow().bold());
    match find_latest_metadata(&dir)? {
        Some(path) => {
            let metadata = load_metadata(&dir, None);
            println!("  File: {}", path.display());
            println!("  Commit: {}", metadata.commit_hash());
            println!("  Branch: {}", metadata.branch());
        }
        None => println!("  {} No metadata files", "!".yellow()),
    }

    println!();
    Ok(())
}

fn describe(path: Option<&Path>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "none".dimmed().to_string(),
    }
}
