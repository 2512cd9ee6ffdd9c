//! Baseline-vs-latest comparison and regression classification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::parser::{Measurement, Measurements};

/// Default regression threshold, in percent.
pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// Thresholds are finite, non-negative percentages.
pub fn is_valid_threshold(threshold: f64) -> bool {
    threshold.is_finite() && threshold >= 0.0
}

/// Classification of one benchmark's change between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Regression,
    Improvement,
    Unchanged,
}

impl Status {
    /// Timing values: slower (positive change) is a regression. Both bounds
    /// are strict, so a change exactly at the threshold is unchanged.
    pub fn classify(change_percent: f64, threshold: f64) -> Self {
        if change_percent > threshold {
            Status::Regression
        } else if change_percent < -threshold {
            Status::Improvement
        } else {
            Status::Unchanged
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Regression => "regression",
            Status::Improvement => "improvement",
            Status::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The diff of one benchmark present in both runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub name: String,
    pub baseline_value: f64,
    pub latest_value: f64,
    /// Unit of both values, taken from the baseline measurement.
    pub unit: String,
    pub change_percent: f64,
    pub status: Status,
}

impl ComparisonRecord {
    pub fn is_regression(&self) -> bool {
        self.status == Status::Regression
    }

    pub fn is_improvement(&self) -> bool {
        self.status == Status::Improvement
    }
}

/// Signed percentage change from `baseline` to `latest`; zero when the
/// baseline is zero.
pub fn change_percent(baseline: f64, latest: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        ((latest - baseline) / baseline) * 100.0
    }
}

/// Nanoseconds per unit for the time units parsers emit.
fn ns_per_unit(unit: &str) -> Option<f64> {
    match unit {
        "ns" => Some(1.0),
        "us" => Some(1_000.0),
        "ms" => Some(1_000_000.0),
        "s" => Some(1_000_000_000.0),
        _ => None,
    }
}

/// Express `value` (in `from`) in `to`, if both are known time units.
fn convert(value: f64, from: &str, to: &str) -> Option<f64> {
    if from == to {
        return Some(value);
    }
    Some(value * ns_per_unit(from)? / ns_per_unit(to)?)
}

/// Full result of comparing two runs of one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    /// Records for names present in both runs, ordered by name.
    pub records: Vec<ComparisonRecord>,
    /// Names only present in the latest run.
    pub added: Vec<String>,
    /// Names only present in the baseline run.
    pub removed: Vec<String>,
    /// Names whose units could not be reconciled between runs.
    pub incompatible: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Comparator {
    threshold: f64,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Comparator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn compare(&self, baseline: &Measurements, latest: &Measurements) -> Comparison {
        let mut comparison = Comparison::default();

        let all_names: BTreeSet<&String> = baseline.keys().chain(latest.keys()).collect();

        for name in all_names {
            match (baseline.get(name), latest.get(name)) {
                (Some(base), Some(curr)) => match self.record(base, curr) {
                    Some(record) => comparison.records.push(record),
                    None => comparison.incompatible.push(name.clone()),
                },
                (None, Some(_)) => comparison.added.push(name.clone()),
                (Some(_), None) => comparison.removed.push(name.clone()),
                (None, None) => {}
            }
        }

        comparison
    }

    fn record(&self, base: &Measurement, curr: &Measurement) -> Option<ComparisonRecord> {
        let latest_value = convert(curr.value, &curr.unit, &base.unit)?;
        let change = change_percent(base.value, latest_value);

        Some(ComparisonRecord {
            name: base.name.clone(),
            baseline_value: base.value,
            latest_value,
            unit: base.unit.clone(),
            change_percent: change,
            status: Status::classify(change, self.threshold),
        })
    }
}

/// Compare two runs and return one record per shared name, ordered by name.
pub fn compare_results(
    baseline: &Measurements,
    latest: &Measurements,
    threshold: f64,
) -> Vec<ComparisonRecord> {
    Comparator::new(threshold).compare(baseline, latest).records
}

/// Classification counts over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub regressions: usize,
    pub improvements: usize,
    pub unchanged: usize,
}

impl Summary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ComparisonRecord>) -> Self {
        let mut summary = Summary::default();
        for record in records {
            summary.total += 1;
            match record.status {
                Status::Regression => summary.regressions += 1,
                Status::Improvement => summary.improvements += 1,
                Status::Unchanged => summary.unchanged += 1,
            }
        }
        summary
    }

    pub fn has_regressions(&self) -> bool {
        self.regressions > 0
    }
}
