//! Narrative markdown report.

use anyhow::Result;

use super::{Renderer, ReportInput};
use crate::compare::diff::{ComparisonRecord, Status};
use crate::formatter::{format_signed_percent, format_value};
use crate::metadata::{
    RunMetadata, BRANCH, COMMIT_DATE, COMMIT_HASH, NOT_AVAILABLE, UNKNOWN,
};
use crate::parser::Source;

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, input: &ReportInput<'_>) -> Result<String> {
        let mut md = String::new();

        md.push_str("# Performance Comparison Report\n\n");
        md.push_str(&format!(
            "Generated: {}\n\n",
            input.generated.format("%Y-%m-%d %H:%M:%S")
        ));

        push_environment(&mut md, input.metadata, input.baseline_metadata);
        push_summary(&mut md, input);

        for (source, records) in input.sections() {
            if !records.is_empty() {
                push_source_table(&mut md, source, records);
            }
        }

        let regressions: Vec<_> = input.all_records().filter(|c| c.is_regression()).collect();
        if !regressions.is_empty() {
            md.push_str("## Regressions Requiring Investigation\n\n");
            for c in regressions {
                md.push_str(&format!("### {}\n\n", c.name));
                md.push_str(&format!("- Baseline: {}\n", format_value(c.baseline_value, &c.unit)));
                md.push_str(&format!("- Current: {}\n", format_value(c.latest_value, &c.unit)));
                md.push_str(&format!("- Regression: +{:.2}%\n\n", c.change_percent));
            }
        }

        let improvements: Vec<_> = input.all_records().filter(|c| c.is_improvement()).collect();
        if !improvements.is_empty() {
            md.push_str("## Notable Improvements\n\n");
            for c in improvements {
                md.push_str(&format!(
                    "- **{}**: {} -> {} ({:.2}%)\n",
                    c.name,
                    format_value(c.baseline_value, &c.unit),
                    format_value(c.latest_value, &c.unit),
                    c.change_percent
                ));
            }
            md.push('\n');
        }

        Ok(md)
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

fn push_environment(md: &mut String, current: &RunMetadata, baseline: Option<&RunMetadata>) {
    // An empty baseline map reads as "no baseline".
    let baseline = baseline.filter(|b| !b.is_empty());
    let base = |key: &str| match baseline {
        Some(b) => b.get_or(key, UNKNOWN),
        None => NOT_AVAILABLE.to_string(),
    };

    md.push_str("## Environment\n\n");
    md.push_str("| Property | Current | Baseline |\n");
    md.push_str("|----------|---------|----------|\n");
    md.push_str(&format!(
        "| Commit | `{}` | `{}` |\n",
        current.get_or(COMMIT_HASH, UNKNOWN),
        base(COMMIT_HASH)
    ));
    md.push_str(&format!(
        "| Branch | `{}` | `{}` |\n",
        current.get_or(BRANCH, UNKNOWN),
        base(BRANCH)
    ));
    md.push_str(&format!(
        "| Date | {} | {} |\n\n",
        current.get_or(COMMIT_DATE, UNKNOWN),
        base(COMMIT_DATE)
    ));
}

fn push_summary(md: &mut String, input: &ReportInput<'_>) {
    let summary = input.summary();

    md.push_str("## Summary\n\n");
    if summary.has_regressions() {
        md.push_str(&format!("**{} regression(s) detected**\n\n", summary.regressions));
    }
    md.push_str(&format!("- Total benchmarks: {}\n", summary.total));
    md.push_str(&format!("- Improvements: {}\n", summary.improvements));
    md.push_str(&format!("- Regressions: {}\n", summary.regressions));
    md.push_str(&format!("- Unchanged: {}\n\n", summary.unchanged));
}

fn push_source_table(md: &mut String, source: Source, records: &[ComparisonRecord]) {
    let label = source.item_label();

    md.push_str(&format!("## {}\n\n", source.title()));
    md.push_str(&format!("| {} | Baseline | Current | Change |\n", label));
    md.push_str(&format!(
        "|{}|----------|---------|--------|\n",
        "-".repeat(label.len() + 2)
    ));

    for c in records {
        md.push_str(&format!(
            "| {} | {} | {} | {} ({}) |\n",
            c.name,
            format_value(c.baseline_value, &c.unit),
            format_value(c.latest_value, &c.unit),
            change_cell(c),
            c.status
        ));
    }
    md.push('\n');
}

/// Regressions carry an explicit `+`, improvements their natural `-`, and
/// unchanged values whichever sign they have.
fn change_cell(c: &ComparisonRecord) -> String {
    match c.status {
        Status::Regression => format!("+{:.2}%", c.change_percent),
        Status::Improvement => format!("{:.2}%", c.change_percent),
        Status::Unchanged => format_signed_percent(c.change_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{fixed_time, record};
    use super::*;

    fn render(
        rust: &[ComparisonRecord],
        swift: &[ComparisonRecord],
        meta: &RunMetadata,
        baseline: Option<&RunMetadata>,
    ) -> String {
        let input = ReportInput::new(rust, swift, meta)
            .with_baseline_metadata(baseline)
            .generated_at(fixed_time());
        MarkdownRenderer.render(&input).unwrap()
    }

    #[test]
    fn header_and_environment_defaults() {
        let md = render(&[], &[], &RunMetadata::new(), None);
        assert!(md.starts_with(
            "# Performance Comparison Report\n\nGenerated: 2025-01-10 09:30:00\n"
        ));
        assert!(md.contains("| Commit | `unknown` | `N/A` |"));
        assert!(md.contains("| Branch | `unknown` | `N/A` |"));
        assert!(md.contains("| Date | unknown | N/A |"));
    }

    #[test]
    fn environment_contrasts_current_and_baseline() {
        let current = RunMetadata::new()
            .with(COMMIT_HASH, "abc1234")
            .with(BRANCH, "feature/scan");
        let baseline = RunMetadata::new().with(COMMIT_HASH, "def5678");
        let md = render(&[], &[], &current, Some(&baseline));

        assert!(md.contains("| Commit | `abc1234` | `def5678` |"));
        assert!(md.contains("| Branch | `feature/scan` | `unknown` |"));
        assert!(md.contains("| Date | unknown | unknown |"));
    }

    #[test]
    fn empty_baseline_metadata_reads_as_not_available() {
        let md = render(&[], &[], &RunMetadata::new(), Some(&RunMetadata::new()));
        assert!(md.contains("| Commit | `unknown` | `N/A` |"));
    }

    #[test]
    fn summary_headline_only_with_regressions() {
        let calm = vec![record("a", 100.0, 101.0, "ns", Status::Unchanged)];
        let md = render(&calm, &[], &RunMetadata::new(), None);
        assert!(!md.contains("regression(s) detected"));
        assert!(md.contains(
            "- Total benchmarks: 1\n- Improvements: 0\n- Regressions: 0\n- Unchanged: 1"
        ));

        let slow = vec![record("a", 100.0, 150.0, "ns", Status::Regression)];
        let md = render(&slow, &[], &RunMetadata::new(), None);
        assert!(md.contains("**1 regression(s) detected**"));
    }

    #[test]
    fn source_tables_render_change_strings() {
        let rust = vec![
            record("fast_path", 1_000.0, 500.0, "ns", Status::Improvement),
            record("scan_dir", 100.0, 106.0, "ns", Status::Regression),
            record("steady", 100.0, 98.0, "ns", Status::Unchanged),
        ];
        let swift = vec![record("testScan", 250.0, 255.0, "ms", Status::Unchanged)];
        let md = render(&rust, &swift, &RunMetadata::new(), None);

        assert!(md.contains(
            "## Rust Benchmarks\n\n| Benchmark | Baseline | Current | Change |\n|-----------|----------|---------|--------|\n"
        ));
        assert!(md.contains("| fast_path | 1.00us | 500ns | -50.00% (improvement) |"));
        assert!(md.contains("| scan_dir | 100ns | 106ns | +6.00% (regression) |"));
        assert!(md.contains("| steady | 100ns | 98ns | -2.00% (unchanged) |"));

        assert!(md.contains(
            "## Swift Performance Tests\n\n| Test | Baseline | Current | Change |\n|------|----------|---------|--------|\n"
        ));
        assert!(md.contains("| testScan | 250.00ms | 255.00ms | +2.00% (unchanged) |"));
    }

    #[test]
    fn empty_source_sections_are_omitted() {
        let swift = vec![record("testScan", 250.0, 255.0, "ms", Status::Unchanged)];
        let md = render(&[], &swift, &RunMetadata::new(), None);
        assert!(!md.contains("## Rust Benchmarks"));
        assert!(md.contains("## Swift Performance Tests"));
    }

    #[test]
    fn regression_details_merge_sources_in_order() {
        let rust = vec![record("scan_dir", 100.0, 120.0, "ns", Status::Regression)];
        let swift = vec![record("testScan", 200.0, 300.0, "ms", Status::Regression)];
        let md = render(&rust, &swift, &RunMetadata::new(), None);

        let section = md
            .split("## Regressions Requiring Investigation\n\n")
            .nth(1)
            .unwrap();
        assert!(section.starts_with(
            "### scan_dir\n\n- Baseline: 100ns\n- Current: 120ns\n- Regression: +20.00%\n\n### testScan\n"
        ));
        assert!(
            section.contains("- Baseline: 200.00ms\n- Current: 300.00ms\n- Regression: +50.00%")
        );
    }

    #[test]
    fn improvements_listed_as_arrow_diffs() {
        let rust = vec![record(
            "fast_path",
            2_000_000.0,
            1_000_000.0,
            "ns",
            Status::Improvement,
        )];
        let md = render(&rust, &[], &RunMetadata::new(), None);
        assert!(md.contains(
            "## Notable Improvements\n\n- **fast_path**: 2.00ms -> 1.00ms (-50.00%)\n"
        ));
        assert!(!md.contains("## Regressions Requiring Investigation"));
    }

    #[test]
    fn no_roll_up_sections_without_changes() {
        let md = render(&[], &[], &RunMetadata::new(), None);
        assert!(!md.contains("## Regressions Requiring Investigation"));
        assert!(!md.contains("## Notable Improvements"));
        assert!(md.contains("- Total benchmarks: 0"));
    }
}
