//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a batch,
//! including the summary figures, a per-container results table with
//! performance tiers, and the legend of tier thresholds.

use crate::audit::AuditResult;
use crate::output::classify::{classify, MetricKind};
use crate::output::summary::AuditSummary;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown report and writes it to `output_path`
///
/// # Arguments
///
/// * `results` - The batch results, in input order
/// * `summary` - The batch summary
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(
    results: &[AuditResult],
    summary: &AuditSummary,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(results, summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a batch as markdown
pub fn format_markdown_report(results: &[AuditResult], summary: &AuditSummary) -> String {
    let mut md = String::new();

    md.push_str("# GTM Monitoring System Report\n\n");

    // Summary
    md.push_str("## Audit Summary\n\n");
    md.push_str(&format!("- **Total URLs**: {}\n", summary.total_urls));
    md.push_str(&format!("- **Successful**: {}\n", summary.successful_audits));
    md.push_str(&format!("- **Containers**: {}\n", summary.total_containers));
    md.push_str(&format!("- **Avg CPU**: {}ms\n", summary.average_cpu_time));
    md.push_str(&format!(
        "- **Avg Script Eval**: {}ms\n",
        summary.average_script_eval
    ));
    md.push_str(&format!(
        "- **Avg Parse**: {}ms\n\n",
        summary.average_parse_time
    ));

    if !results.is_empty() {
        md.push_str("## Audit Results\n\n");
        md.push_str("| URL | Container ID | CPU | Eval | Parse | Status |\n");
        md.push_str("|-----|--------------|-----|------|-------|--------|\n");

        for result in results {
            if result.is_success() && !result.gtm_metrics.is_empty() {
                for (index, metric) in result.gtm_metrics.iter().enumerate() {
                    let (url, status) = if index == 0 {
                        (escape_cell(&result.url), "Success")
                    } else {
                        (String::new(), "")
                    };
                    md.push_str(&format!(
                        "| {} | {} | {} ({}) | {} ({}) | {} ({}) | {} |\n",
                        url,
                        escape_cell(&metric.container_id),
                        metric.total_cpu_time,
                        classify(metric.total_cpu_time, MetricKind::Cpu),
                        metric.script_evaluation,
                        classify(metric.script_evaluation, MetricKind::Script),
                        metric.script_parse_time,
                        classify(metric.script_parse_time, MetricKind::Script),
                        status
                    ));
                }
            } else {
                let (message, status) = if result.is_success() {
                    ("No GTM containers", "Success")
                } else {
                    (result.error.as_deref().unwrap_or("Audit failed"), "Error")
                };
                md.push_str(&format!(
                    "| {} | {} | | | | {} |\n",
                    escape_cell(&result.url),
                    escape_cell(message),
                    status
                ));
            }
        }
        md.push('\n');
    }

    md.push_str("## Performance Standards\n\n");
    for kind in [MetricKind::Cpu, MetricKind::Script] {
        let (good, warning) = kind.thresholds();
        md.push_str(&format!("### {}\n\n", kind.label()));
        md.push_str(&format!("- ≤{}ms: Good\n", good));
        md.push_str(&format!("- {}-{}ms: Warning\n", good + 1.0, warning));
        md.push_str(&format!("- >{}ms: Critical\n\n", warning));
    }

    md
}

/// Keeps a value from breaking out of its table cell
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::GtmMetric;

    fn create_test_results() -> Vec<AuditResult> {
        vec![
            AuditResult::succeeded(
                "https://a.com",
                vec![
                    GtmMetric {
                        container_id: "GTM-AAA".to_string(),
                        total_cpu_time: 400.0,
                        script_evaluation: 100.0,
                        script_parse_time: 50.0,
                    },
                    GtmMetric {
                        container_id: "GTM-BBB".to_string(),
                        total_cpu_time: 1200.0,
                        script_evaluation: 250.0,
                        script_parse_time: 600.0,
                    },
                ],
            ),
            AuditResult::failed("https://fails.com", "HTTP 500"),
        ]
    }

    #[test]
    fn test_format_markdown_report() {
        let results = create_test_results();
        let summary = AuditSummary::from_results(&results);
        let markdown = format_markdown_report(&results, &summary);

        assert!(markdown.contains("# GTM Monitoring System Report"));
        assert!(markdown.contains("- **Total URLs**: 2"));
        assert!(markdown.contains("- **Containers**: 2"));
        assert!(markdown.contains("- **Avg CPU**: 800ms"));
    }

    #[test]
    fn test_results_table_tiers() {
        let results = create_test_results();
        let summary = AuditSummary::from_results(&results);
        let markdown = format_markdown_report(&results, &summary);

        assert!(markdown.contains(
            "| https://a.com | GTM-AAA | 400 (good) | 100 (good) | 50 (good) | Success |"
        ));
        assert!(markdown.contains(
            "|  | GTM-BBB | 1200 (critical) | 250 (warning) | 600 (critical) |  |"
        ));
        assert!(markdown.contains("| https://fails.com | HTTP 500 | | | | Error |"));
    }

    #[test]
    fn test_success_without_containers() {
        let results = vec![AuditResult::succeeded("https://empty.com", vec![])];
        let markdown = format_markdown_report(&results, &AuditSummary::from_results(&results));

        assert!(markdown.contains("| https://empty.com | No GTM containers | | | | Success |"));
        assert!(!markdown.contains("Audit failed"));
    }

    #[test]
    fn test_legend() {
        let markdown = format_markdown_report(&[], &AuditSummary::default());

        assert!(!markdown.contains("## Audit Results"));
        assert!(markdown.contains("### CPU Time"));
        assert!(markdown.contains("- ≤500ms: Good"));
        assert!(markdown.contains("- 501-1000ms: Warning"));
        assert!(markdown.contains("- >500ms: Critical"));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let results = create_test_results();
        let summary = AuditSummary::from_results(&results);

        generate_markdown_report(&results, &summary, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format_markdown_report(&results, &summary));
    }
}
