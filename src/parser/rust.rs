//! Parser for Rust benchmark result JSON.
//!
//! Expected shape:
//!
//! ```json
//! { "benchmarks": { "scan_dir": { "mean_ns": 1250.0, "unit": "ns" } } }
//! ```

use serde_json::Value;
use std::fs;
use std::path::Path;

use super::{as_number, Measurement, Measurements, ParseOutput, ParseWarning, SourceParser};
use crate::error::FormatError;

const DEFAULT_UNIT: &str = "ns";

#[derive(Debug, Default, Clone, Copy)]
pub struct RustParser;

impl RustParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a results document already loaded into memory.
    ///
    /// A document without a `benchmarks` key is empty; a document or
    /// `benchmarks` value that is not an object is an error.
    pub fn parse_str(&self, content: &str) -> Result<Measurements, FormatError> {
        let data: Value = serde_json::from_str(content)?;
        self.extract(&data)
    }

    fn extract(&self, data: &Value) -> Result<Measurements, FormatError> {
        let mut results = Measurements::new();

        let document = data
            .as_object()
            .ok_or(FormatError::NotAnObject("the results document"))?;
        let Some(benchmarks) = document.get("benchmarks") else {
            return Ok(results);
        };
        let benchmarks = benchmarks
            .as_object()
            .ok_or(FormatError::NotAnObject("`benchmarks`"))?;

        for (name, info) in benchmarks {
            let Some(info) = info.as_object() else {
                continue;
            };

            let raw_value = info.get("value").and_then(as_number);
            let value = info
                .get("mean_ns")
                .and_then(as_number)
                .or(raw_value)
                .unwrap_or(0.0);
            let unit = info
                .get("unit")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_UNIT);

            results.insert(
                name.clone(),
                Measurement::new(name.as_str(), value, unit).with_raw_value(raw_value),
            );
        }

        Ok(results)
    }
}

impl SourceParser for RustParser {
    fn parse_file(&self, path: &Path) -> ParseOutput {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return ParseOutput::warning(ParseWarning::at(
                    path,
                    format!("could not read Rust results: {}", e),
                ))
            }
        };

        match self.parse_str(&content) {
            Ok(measurements) => ParseOutput::from_measurements(measurements),
            Err(e) => ParseOutput::warning(ParseWarning::at(
                path,
                format!("could not parse Rust results: {}", e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Measurements {
        RustParser::new().parse_str(content).unwrap()
    }

    #[test]
    fn mean_ns_entry() {
        let results = parse(r#"{"benchmarks": {"x": {"mean_ns": 250, "unit": "ns"}}}"#);
        assert_eq!(results.len(), 1);
        let x = &results["x"];
        assert_eq!(x.name, "x");
        assert_eq!(x.value, 250.0);
        assert_eq!(x.unit, "ns");
        assert_eq!(x.raw_value, None);
    }

    #[test]
    fn falls_back_to_value_field_and_keeps_it_as_raw() {
        let results = parse(r#"{"benchmarks": {"y": {"value": 12.5}}}"#);
        assert_eq!(results["y"].value, 12.5);
        assert_eq!(results["y"].raw_value, Some(12.5));
        assert_eq!(results["y"].unit, "ns");
    }

    #[test]
    fn mean_ns_wins_over_value() {
        let results =
            parse(r#"{"benchmarks": {"z": {"mean_ns": 300, "value": 0.3, "unit": "us"}}}"#);
        assert_eq!(results["z"].value, 300.0);
        assert_eq!(results["z"].raw_value, Some(0.3));
        assert_eq!(results["z"].unit, "us");
    }

    #[test]
    fn missing_metrics_default_to_zero() {
        let results = parse(r#"{"benchmarks": {"empty": {}}}"#);
        assert_eq!(results["empty"].value, 0.0);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let results = parse(r#"{"benchmarks": {"s": {"mean_ns": "1500"}}}"#);
        assert_eq!(results["s"].value, 1500.0);
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let results = parse(r#"{"benchmarks": {"bad": 5, "good": {"mean_ns": 1}}}"#);
        assert_eq!(results.len(), 1);
        assert!(results.contains_key("good"));
    }

    #[test]
    fn document_without_benchmarks_is_empty() {
        assert!(parse(r#"{"other": {}}"#).is_empty());
    }

    #[test]
    fn duplicate_names_keep_the_last_entry() {
        let results = parse(r#"{"benchmarks": {"d": {"mean_ns": 1}, "d": {"mean_ns": 2}}}"#);
        assert_eq!(results.len(), 1);
        assert_eq!(results["d"].value, 2.0);
    }

    #[test]
    fn wrong_shapes_are_errors() {
        let parser = RustParser::new();
        assert!(matches!(
            parser.parse_str("[]"),
            Err(FormatError::NotAnObject(_))
        ));
        assert!(matches!(
            parser.parse_str(r#"{"benchmarks": [{"mean_ns": 1}]}"#),
            Err(FormatError::NotAnObject(_))
        ));
    }

    #[test]
    fn invalid_json_is_an_error_for_parse_str() {
        assert!(RustParser::new().parse_str("not json {{").is_err());
    }

    #[test]
    fn parse_file_warns_on_malformed_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rust-broken.json");
        fs::write(&path, "{ nope").unwrap();

        let output = RustParser::new().parse_file(&path);
        assert!(output.is_empty());
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].to_string().contains("rust-broken.json"));
    }

    #[test]
    fn parse_file_warns_when_benchmarks_is_not_an_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rust-list.json");
        fs::write(&path, r#"{"benchmarks": [{"mean_ns": 1}]}"#).unwrap();

        let output = RustParser::new().parse_file(&path);
        assert!(output.is_empty());
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].message.contains("`benchmarks`"));
    }

    #[test]
    fn parse_file_warns_on_missing_file() {
        let tmp = TempDir::new().unwrap();
        let output = RustParser::new().parse_file(&tmp.path().join("absent.json"));
        assert!(output.is_empty());
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn parse_file_reads_entries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rust-1.json");
        fs::write(
            &path,
            r#"{"benchmarks": {"a": {"mean_ns": 100}, "b": {"mean_ns": 2000}}}"#,
        )
        .unwrap();

        let output = RustParser::new().parse_file(&path);
        assert!(output.warnings.is_empty());
        assert_eq!(output.measurements.len(), 2);
        assert_eq!(output.measurements["b"].value, 2000.0);
    }
}
