//! Locating result files inside a results directory.
//!
//! Result files are named `<prefix>-<run id>.<json|txt>`, with an optional
//! `<prefix>-baseline.<json|txt>` pinned baseline. "Latest" means newest by
//! modification time.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const EXTENSIONS: [&str; 2] = ["json", "txt"];

/// Files matching `<prefix>-*.json`, or `<prefix>-*.txt` when there are no JSON
/// files, newest first.
pub fn candidates_by_mtime(results_dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    for ext in EXTENSIONS {
        let mut files = glob_files(results_dir, &format!("{}-*.{}", prefix, ext))?;
        if files.is_empty() {
            continue;
        }
        files.sort_by_cached_key(|path| std::cmp::Reverse(modified(path)));
        return Ok(files);
    }
    Ok(Vec::new())
}

/// Most recent results file for `prefix`.
pub fn find_latest_results(results_dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    Ok(candidates_by_mtime(results_dir, prefix)?.into_iter().next())
}

/// Pinned baseline for `prefix`, or the second most recent results file.
pub fn find_baseline_results(results_dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    for ext in EXTENSIONS {
        let pinned = results_dir.join(format!("{}-baseline.{}", prefix, ext));
        if pinned.exists() {
            return Ok(Some(pinned));
        }
    }

    Ok(candidates_by_mtime(results_dir, prefix)?.into_iter().nth(1))
}

/// Most recent `metadata-*.json`.
pub fn find_latest_metadata(results_dir: &Path) -> Result<Option<PathBuf>> {
    let mut files = glob_files(results_dir, "metadata-*.json")?;
    files.sort_by_cached_key(|path| std::cmp::Reverse(modified(path)));
    Ok(files.into_iter().next())
}

fn glob_files(dir: &Path, file_pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        file_pattern
    );
    let paths = glob::glob(&pattern)
        .with_context(|| format!("Invalid results pattern {}", pattern))?;

    Ok(paths
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect())
}

fn modified(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}
