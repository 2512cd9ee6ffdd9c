//! Free-form run metadata (`metadata-<run id>.json`).
//!
//! Every field is optional; accessors fall back to a caller-supplied default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::compare::discovery::find_latest_metadata;

pub const COMMIT_HASH: &str = "commit_hash";
pub const BRANCH: &str = "branch";
pub const COMMIT_DATE: &str = "commit_date";
pub const TIMESTAMP: &str = "timestamp";

/// Placeholder for a missing field of a run that has metadata.
pub const UNKNOWN: &str = "unknown";
/// Placeholder for every field when no baseline metadata was loaded.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunMetadata(Map<String, Value>);

impl RunMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Field rendered as text; non-string JSON values use their JSON form.
    /// A `null` field counts as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn commit_hash(&self) -> String {
        self.get_or(COMMIT_HASH, UNKNOWN)
    }

    pub fn branch(&self) -> String {
        self.get_or(BRANCH, UNKNOWN)
    }

    pub fn commit_date(&self) -> String {
        self.get_or(COMMIT_DATE, UNKNOWN)
    }

    pub fn timestamp(&self) -> Option<String> {
        self.get(TIMESTAMP)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Load `metadata-<identifier>.json`, or the newest `metadata-*.json` when no
/// identifier is given. Missing or invalid metadata is an empty map.
pub fn load_metadata(results_dir: &Path, identifier: Option<&str>) -> RunMetadata {
    let path = match identifier {
        Some(id) => Some(results_dir.join(format!("metadata-{}.json", id))),
        None => find_latest_metadata(results_dir).unwrap_or_default(),
    };

    let Some(path) = path else {
        return RunMetadata::new();
    };

    match fs::read_to_string(&path)
        .ok()
        .and_then(|content| serde_json::from_str::<Map<String, Value>>(&content).ok())
    {
        Some(map) => RunMetadata::from_map(map),
        None => {
            tracing::debug!(path = %path.display(), "no usable run metadata");
            RunMetadata::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_fields_fall_back_independently() {
        let meta = RunMetadata::new().with(COMMIT_HASH, "abc1234");
        assert_eq!(meta.commit_hash(), "abc1234");
        assert_eq!(meta.branch(), "unknown");
        assert_eq!(meta.commit_date(), "unknown");
        assert_eq!(meta.timestamp(), None);
    }

    #[test]
    fn non_string_values_render_as_json() {
        let meta = RunMetadata::new().with("run", 42).with("flaky", false);
        assert_eq!(meta.get("run").as_deref(), Some("42"));
        assert_eq!(meta.get("flaky").as_deref(), Some("false"));
    }

    #[test]
    fn null_values_fall_back_to_defaults() {
        let meta = RunMetadata::new()
            .with(COMMIT_HASH, Value::Null)
            .with(TIMESTAMP, Value::Null);
        assert_eq!(meta.get(COMMIT_HASH), None);
        assert_eq!(meta.commit_hash(), "unknown");
        assert_eq!(meta.timestamp(), None);
    }

    #[test]
    fn serializes_as_plain_object() {
        let meta = RunMetadata::new().with(BRANCH, "main");
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            json!({"branch": "main"})
        );
    }

    #[test]
    fn loads_metadata_by_identifier() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("metadata-20250110-abc.json"),
            r#"{"commit_hash": "abc", "branch": "main", "extra": [1, 2]}"#,
        )
        .unwrap();

        let meta = load_metadata(tmp.path(), Some("20250110-abc"));
        assert_eq!(meta.commit_hash(), "abc");
        assert_eq!(meta.branch(), "main");
        assert_eq!(meta.get("extra").as_deref(), Some("[1,2]"));
    }

    #[test]
    fn loads_latest_metadata_without_identifier() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("metadata-only.json"),
            r#"{"branch": "dev"}"#,
        )
        .unwrap();

        assert_eq!(load_metadata(tmp.path(), None).branch(), "dev");
    }

    #[test]
    fn missing_or_invalid_metadata_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(load_metadata(tmp.path(), None).is_empty());
        assert!(load_metadata(tmp.path(), Some("nope")).is_empty());

        fs::write(tmp.path().join("metadata-bad.json"), "{ not json").unwrap();
        assert!(load_metadata(tmp.path(), Some("bad")).is_empty());

        fs::write(tmp.path().join("metadata-list.json"), "[1, 2]").unwrap();
        assert!(load_metadata(tmp.path(), Some("list")).is_empty());
    }
}
