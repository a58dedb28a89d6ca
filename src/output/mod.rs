//! Output module for batch summaries, exports and reports
//!
//! This module handles:
//! - Aggregating results into summary statistics
//! - Classifying timings into performance tiers
//! - Exporting results as a dated CSV file
//! - Generating markdown reports

pub mod classify;
mod csv;
mod markdown;
pub mod summary;

pub use classify::{classify, MetricKind, PerformanceTier};
pub use csv::{format_csv, CsvQuoting, CSV_HEADERS};
pub use markdown::{format_markdown_report, generate_markdown_report};
pub use summary::{print_summary, AuditSummary};

use crate::audit::AuditResult;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name prefix of CSV exports
pub const DEFAULT_EXPORT_PREFIX: &str = "GTM Monitoring System";

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Name of the CSV export for a given day, e.g. `GTM Monitoring System 2024-05-01.csv`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{} {}.csv", prefix, date.format("%Y-%m-%d"))
}

/// Writes the CSV export into `directory`, named with today's UTC date
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - The directory is missing or the file could not be written
pub fn write_csv_export(
    results: &[AuditResult],
    directory: &Path,
    prefix: &str,
    quoting: CsvQuoting,
) -> OutputResult<PathBuf> {
    let date = chrono::Utc::now().date_naive();
    write_csv_export_dated(results, directory, prefix, quoting, date)
}

/// Writes the CSV export for an explicit date
pub fn write_csv_export_dated(
    results: &[AuditResult],
    directory: &Path,
    prefix: &str,
    quoting: CsvQuoting,
    date: NaiveDate,
) -> OutputResult<PathBuf> {
    if !directory.is_dir() {
        return Err(OutputError::Write(format!(
            "export directory does not exist: {}",
            directory.display()
        )));
    }

    let path = directory.join(export_file_name(prefix, date));
    std::fs::write(&path, format_csv(results, quoting))?;

    tracing::info!("Wrote {} results to {}", results.len(), path.display());
    Ok(path)
}
