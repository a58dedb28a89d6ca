//! Summary statistics for a completed batch
//!
//! This module reduces a batch's result list to the figures shown after
//! the run: counts plus the mean CPU, evaluation and parse times across
//! every container found on successfully audited pages.

use crate::audit::{AuditResult, GtmMetric};
use serde::Serialize;

/// Batch summary statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    /// Number of URLs in the batch
    pub total_urls: usize,

    /// Number of URLs audited successfully
    pub successful_audits: usize,

    /// Number of containers across all successful audits
    pub total_containers: usize,

    /// Mean total CPU time per container (milliseconds)
    pub average_cpu_time: f64,

    /// Mean script evaluation time per container (milliseconds)
    pub average_script_eval: f64,

    /// Mean script parse time per container (milliseconds)
    pub average_parse_time: f64,
}

impl AuditSummary {
    /// Computes the summary of a result list
    ///
    /// The result is independent of the order of `results`.
    pub fn from_results(results: &[AuditResult]) -> Self {
        let successful: Vec<&AuditResult> = results.iter().filter(|r| r.is_success()).collect();
        let metrics: Vec<&GtmMetric> = successful
            .iter()
            .flat_map(|r| r.gtm_metrics.iter())
            .collect();

        if metrics.is_empty() {
            return Self {
                total_urls: results.len(),
                successful_audits: successful.len(),
                ..Self::default()
            };
        }

        Self {
            total_urls: results.len(),
            successful_audits: successful.len(),
            total_containers: metrics.len(),
            average_cpu_time: mean(metrics.iter().map(|m| m.total_cpu_time)),
            average_script_eval: mean(metrics.iter().map(|m| m.script_evaluation)),
            average_parse_time: mean(metrics.iter().map(|m| m.script_parse_time)),
        }
    }

    /// Number of URLs whose audit failed
    pub fn failed_audits(&self) -> usize {
        self.total_urls - self.successful_audits
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_urls == 0 {
            return 0.0;
        }
        (self.successful_audits as f64 / self.total_urls as f64) * 100.0
    }
}

/// Arithmetic mean, summed in sorted order so input order cannot change the result
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    values.iter().sum::<f64>() / values.len() as f64
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &AuditSummary) {
    println!("=== Audit Summary ===\n");

    println!("Overview:");
    println!("  Total URLs: {}", summary.total_urls);
    println!("  Successful: {}", summary.successful_audits);
    println!("  Failed: {}", summary.failed_audits());
    println!("  Containers: {}", summary.total_containers);
    println!();

    println!("Averages per container:");
    println!("  CPU time: {:.1}ms", summary.average_cpu_time);
    println!("  Script evaluation: {:.1}ms", summary.average_script_eval);
    println!("  Script parse: {:.1}ms", summary.average_parse_time);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} URLs audited)",
        summary.success_rate(),
        summary.successful_audits,
        summary.total_urls
    );
}
