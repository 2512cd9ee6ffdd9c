//! Result-file parsers for the two benchmark tool-chains.
//!
//! Each parser turns one raw result artifact into a [`Measurements`] map of
//! benchmark name to [`Measurement`]. Parsing never fails: malformed or missing
//! input produces an empty map plus [`ParseWarning`]s for the caller to report.

pub mod rust;
pub mod xctest;

pub use rust::RustParser;
pub use xctest::XcTestParser;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// One data point from one tool-chain's result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    /// Magnitude in the parser's canonical unit.
    pub value: f64,
    pub unit: String,
    /// Pre-normalization magnitude, kept for diagnostics only.
    pub raw_value: Option<f64>,
}

impl Measurement {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
            raw_value: None,
        }
    }

    pub fn with_raw_value(mut self, raw_value: Option<f64>) -> Self {
        self.raw_value = raw_value;
        self
    }
}

/// Benchmark name to measurement, ordered by name. Later inserts win.
pub type Measurements = BTreeMap<String, Measurement>;

/// Non-fatal problem encountered while parsing a result artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub path: Option<PathBuf>,
    pub message: String,
}

impl ParseWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }

    pub fn at(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Measurements recovered from one artifact, plus anything worth warning about.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub measurements: Measurements,
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutput {
    pub fn from_measurements(measurements: Measurements) -> Self {
        Self {
            measurements,
            warnings: Vec::new(),
        }
    }

    pub fn warning(warning: ParseWarning) -> Self {
        Self {
            measurements: Measurements::new(),
            warnings: vec![warning],
        }
    }

    /// Attach `path` to any warnings that were raised without one.
    fn located(mut self, path: &Path) -> Self {
        for warning in &mut self.warnings {
            if warning.path.is_none() {
                warning.path = Some(path.to_path_buf());
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

/// A parser for one tool-chain's result artifacts.
pub trait SourceParser {
    /// Parse the artifact at `path`.
    fn parse_file(&self, path: &Path) -> ParseOutput;
}

/// The two benchmark tool-chains a comparison covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Rust benchmark JSON, measured in nanoseconds.
    Rust,
    /// XCTest performance output, measured in milliseconds.
    Swift,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Rust, Source::Swift];

    /// Key used in structured reports and as the result-file prefix.
    pub fn key(self) -> &'static str {
        match self {
            Source::Rust => "rust",
            Source::Swift => "swift",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Source::Rust => "Rust Benchmarks",
            Source::Swift => "Swift Performance Tests",
        }
    }

    /// Heading of the name column in narrative tables.
    pub fn item_label(self) -> &'static str {
        match self {
            Source::Rust => "Benchmark",
            Source::Swift => "Test",
        }
    }

    /// Extension of the per-run result file named by an explicit run identifier.
    pub fn run_extension(self) -> &'static str {
        match self {
            Source::Rust => "json",
            Source::Swift => "txt",
        }
    }

    pub fn parser(self) -> Box<dyn SourceParser> {
        match self {
            Source::Rust => Box::new(RustParser::new()),
            Source::Swift => Box::new(XcTestParser::new()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Read a JSON number, or a string holding one.
pub(crate) fn as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
