//! Parser for XCTest performance results.
//!
//! Prefers a sibling JSON summary (`{"tests": {name: {"average_seconds": f}}}`)
//! and otherwise scans the plain-text `xcodebuild test` log for lines such as:
//!
//! ```text
//! Test Case '-[CleanerTests.ScanPerf testScan]' measured [Time, seconds] average: 0.250, ...
//! ```

use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use super::{as_number, Measurement, Measurements, ParseOutput, ParseWarning, SourceParser};
use crate::error::FormatError;

const UNIT: &str = "ms";
const MS_PER_SECOND: f64 = 1000.0;

const TEST_NAME_PATTERN: &str = r"'([^']+)'";
const MEASURED_PATTERN: &str = r"measured.*average:\s+([0-9.]+)";

fn test_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TEST_NAME_PATTERN).expect("test name pattern"))
}

fn measured_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MEASURED_PATTERN).expect("measured pattern"))
}

/// Text scanner state: whether a test name has been seen yet.
#[derive(Debug, Clone, PartialEq)]
enum ScanState {
    NoTest,
    InTest(String),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct XcTestParser;

impl XcTestParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse the JSON summary form.
    pub fn parse_json(&self, content: &str) -> Result<Measurements, FormatError> {
        let data: Value = serde_json::from_str(content)?;
        let mut results = Measurements::new();

        let document = data
            .as_object()
            .ok_or(FormatError::NotAnObject("the XCTest summary"))?;
        let Some(tests) = document.get("tests") else {
            return Ok(results);
        };
        let tests = tests
            .as_object()
            .ok_or(FormatError::NotAnObject("`tests`"))?;

        for (name, info) in tests {
            let Some(info) = info.as_object() else {
                continue;
            };
            let seconds = info
                .get("average_seconds")
                .and_then(as_number)
                .unwrap_or(0.0);
            results.insert(
                name.clone(),
                Measurement::new(name.as_str(), seconds * MS_PER_SECOND, UNIT),
            );
        }

        Ok(results)
    }

    /// Scan a plain-text log.
    ///
    /// A quoted name sets the current test; a `measured ... average:` match is
    /// attributed to the current test. Both may appear on the same line, in
    /// which case the name applies first. Measurements before any name are
    /// dropped.
    pub fn parse_text(&self, content: &str) -> ParseOutput {
        let mut output = ParseOutput::default();
        let mut state = ScanState::NoTest;

        for (index, line) in content.lines().enumerate() {
            if let Some(caps) = test_name_re().captures(line) {
                state = ScanState::InTest(caps[1].to_string());
            }

            let ScanState::InTest(ref name) = state else {
                continue;
            };
            let Some(caps) = measured_re().captures(line) else {
                continue;
            };

            match caps[1].parse::<f64>() {
                Ok(seconds) => {
                    output.measurements.insert(
                        name.clone(),
                        Measurement::new(name.as_str(), seconds * MS_PER_SECOND, UNIT)
                            .with_raw_value(Some(seconds)),
                    );
                }
                Err(_) => output.warnings.push(ParseWarning::new(format!(
                    "line {}: unreadable average '{}' for {}",
                    index + 1,
                    &caps[1],
                    name
                ))),
            }
        }

        output
    }
}

impl SourceParser for XcTestParser {
    fn parse_file(&self, path: &Path) -> ParseOutput {
        let json_path = path.with_extension("json");
        if let Ok(content) = fs::read_to_string(&json_path) {
            match self.parse_json(&content) {
                Ok(measurements) => return ParseOutput::from_measurements(measurements),
                Err(e) => tracing::debug!(
                    path = %json_path.display(),
                    error = %e,
                    "ignoring unparseable XCTest JSON summary"
                ),
            }
        }

        match fs::read_to_string(path) {
            Ok(content) => self.parse_text(&content).located(path),
            Err(e) => ParseOutput::warning(ParseWarning::at(
                path,
                format!("could not parse Swift results: {}", e),
            )),
        }
    }
}
