use std::path::PathBuf;
use thiserror::Error;

/// Conditions under which no report can be produced.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("results directory not found: {}", .0.display())]
    ResultsDirNotFound(PathBuf),
    #[error("no benchmark results found to compare")]
    NoResults,
}

/// A results document that could not be read as the expected shape.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("expected {0} to be a JSON object")]
    NotAnObject(&'static str),
}
