//! Comparison report rendering.
//!
//! A report is a pure function of a [`ReportInput`]; each output encoding is a
//! [`Renderer`] implementation selected through [`ReportFormat`].

mod json;
mod markdown;

pub use json::{JsonRecord, JsonRenderer, JsonReport, JsonSummary};
pub use markdown::MarkdownRenderer;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::compare::diff::{ComparisonRecord, Summary};
use crate::metadata::RunMetadata;
use crate::parser::Source;

/// Everything a renderer needs to produce one report.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub rust: &'a [ComparisonRecord],
    pub swift: &'a [ComparisonRecord],
    pub metadata: &'a RunMetadata,
    pub baseline_metadata: Option<&'a RunMetadata>,
    pub generated: DateTime<Local>,
}

impl<'a> ReportInput<'a> {
    pub fn new(
        rust: &'a [ComparisonRecord],
        swift: &'a [ComparisonRecord],
        metadata: &'a RunMetadata,
    ) -> Self {
        Self {
            rust,
            swift,
            metadata,
            baseline_metadata: None,
            generated: Local::now(),
        }
    }

    pub fn with_baseline_metadata(mut self, baseline: Option<&'a RunMetadata>) -> Self {
        self.baseline_metadata = baseline;
        self
    }

    pub fn generated_at(mut self, generated: DateTime<Local>) -> Self {
        self.generated = generated;
        self
    }

    /// Per-source record sets, in report order.
    pub fn sections(&self) -> [(Source, &'a [ComparisonRecord]); 2] {
        [(Source::Rust, self.rust), (Source::Swift, self.swift)]
    }

    /// Records of both sources, Rust first.
    pub fn all_records(&self) -> impl Iterator<Item = &'a ComparisonRecord> {
        let (rust, swift) = (self.rust, self.swift);
        rust.iter().chain(swift.iter())
    }

    pub fn summary(&self) -> Summary {
        Summary::from_records(self.all_records())
    }
}

/// An output encoding for comparison reports.
pub trait Renderer {
    fn render(&self, input: &ReportInput<'_>) -> Result<String>;

    /// File extension for saved reports.
    fn extension(&self) -> &'static str;
}

/// Output encoding of a comparison report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            ReportFormat::Markdown => Box::new(MarkdownRenderer),
            ReportFormat::Json => Box::new(JsonRenderer),
        }
    }
}

/// Write a fully rendered report to `path`, creating parent directories.
pub fn save(report: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, report).with_context(|| format!("Failed to write report {}", path.display()))
}
