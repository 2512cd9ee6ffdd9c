//! Compare benchmark runs and report performance regressions.
//!
//! Result files from two tool-chains (Rust benchmark JSON and XCTest
//! performance output) are parsed into a common [`parser::Measurement`] shape,
//! diffed baseline-vs-latest by name, classified against a percentage threshold
//! and rendered as a markdown or JSON report.

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod formatter;
pub mod metadata;
pub mod parser;
pub mod report;

pub use compare::{
    compare_results, CompareOptions, CompareOutcome, ComparisonRecord, Status, Summary,
};
pub use error::CompareError;
pub use parser::{Measurement, Measurements, Source};
pub use report::{Renderer, ReportFormat, ReportInput};
