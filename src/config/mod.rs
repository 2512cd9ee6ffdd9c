use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compare::diff::{is_valid_threshold, DEFAULT_THRESHOLD};
use crate::report::ReportFormat;

pub const CONFIG_FILE: &str = ".benchcmprc.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding result files, metadata and reports
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Regression threshold in percent
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Report format when none is given on the command line
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            threshold: default_threshold(),
            format: ReportFormat::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("."))
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        if !is_valid_threshold(config.threshold) {
            bail!(
                "threshold must be a non-negative percentage, got {}",
                config.threshold
            );
        }
        Ok(config)
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("benchmark-results")
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}
