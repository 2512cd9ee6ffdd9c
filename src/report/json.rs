//! Structured JSON report.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{Renderer, ReportInput};
use crate::compare::diff::{ComparisonRecord, Status};
use crate::metadata::RunMetadata;

/// Machine-readable form of a comparison report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonReport {
    pub generated: String,
    pub metadata: RunMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_metadata: Option<RunMetadata>,
    pub summary: JsonSummary,
    pub rust: Vec<JsonRecord>,
    pub swift: Vec<JsonRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSummary {
    pub total: usize,
    pub regressions: usize,
    pub improvements: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRecord {
    pub name: String,
    pub baseline: f64,
    pub current: f64,
    pub unit: String,
    pub change_percent: f64,
    pub status: Status,
}

impl From<&ComparisonRecord> for JsonRecord {
    fn from(c: &ComparisonRecord) -> Self {
        Self {
            name: c.name.clone(),
            baseline: c.baseline_value,
            current: c.latest_value,
            unit: c.unit.clone(),
            change_percent: c.change_percent,
            status: c.status,
        }
    }
}

impl JsonReport {
    pub fn new(input: &ReportInput<'_>) -> Self {
        let summary = input.summary();

        Self {
            generated: input.generated.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            metadata: input.metadata.clone(),
            baseline_metadata: input.baseline_metadata.cloned(),
            summary: JsonSummary {
                total: summary.total,
                regressions: summary.regressions,
                improvements: summary.improvements,
            },
            rust: input.rust.iter().map(JsonRecord::from).collect(),
            swift: input.swift.iter().map(JsonRecord::from).collect(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, input: &ReportInput<'_>) -> Result<String> {
        Ok(serde_json::to_string_pretty(&JsonReport::new(input))?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
