//! CSV export of batch results
//!
//! One row per container; a failed page, or a page without containers,
//! gets a single row with `-` in the metric columns. Within a page's group
//! of rows only the first carries the URL and status.

use crate::audit::AuditResult;
use serde::Deserialize;

/// Header row of the export
pub const CSV_HEADERS: [&str; 7] = [
    "URL",
    "Container ID",
    "Total CPU Time (ms)",
    "Script Evaluation (ms)",
    "Script Parse Time (ms)",
    "Status",
    "Error",
];

const PLACEHOLDER: &str = "-";

/// How cells are quoted in the export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvQuoting {
    /// URL and error wrapped in double quotes, nothing escaped
    #[default]
    Lenient,

    /// RFC 4180: embedded quotes doubled, any field with a delimiter quoted
    Strict,
}

impl CsvQuoting {
    /// Renders a URL or error cell, which are always quoted
    fn quoted(&self, value: &str) -> String {
        match self {
            Self::Lenient => format!("\"{}\"", value),
            Self::Strict => format!("\"{}\"", value.replace('"', "\"\"")),
        }
    }

    /// Renders any other cell
    fn plain(&self, value: &str) -> String {
        match self {
            Self::Lenient => value.to_string(),
            Self::Strict if needs_quoting(value) => self.quoted(value),
            Self::Strict => value.to_string(),
        }
    }
}

fn needs_quoting(value: &str) -> bool {
    value.contains([',', '"', '\n', '\r'])
}

/// Formats results as CSV text, lines joined with `\n`
///
/// # Example
///
/// ```
/// use gtm_audit::audit::AuditResult;
/// use gtm_audit::output::{format_csv, CsvQuoting};
///
/// let csv = format_csv(&[AuditResult::failed("https://a.com", "HTTP 500")], CsvQuoting::Lenient);
/// assert!(csv.ends_with("\"https://a.com\",-,-,-,-,error,\"HTTP 500\""));
/// ```
pub fn format_csv(results: &[AuditResult], quoting: CsvQuoting) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for result in results {
        let status = result.status.as_str();

        if !result.is_success() || result.gtm_metrics.is_empty() {
            let error = result.error.as_deref().unwrap_or("");
            lines.push(
                [
                    quoting.quoted(&result.url),
                    PLACEHOLDER.to_string(),
                    PLACEHOLDER.to_string(),
                    PLACEHOLDER.to_string(),
                    PLACEHOLDER.to_string(),
                    status.to_string(),
                    quoting.quoted(error),
                ]
                .join(","),
            );
            continue;
        }

        for (index, metric) in result.gtm_metrics.iter().enumerate() {
            let (url, status) = if index == 0 {
                (quoting.quoted(&result.url), status.to_string())
            } else {
                (String::new(), String::new())
            };

            lines.push(
                [
                    url,
                    quoting.plain(&metric.container_id),
                    metric.total_cpu_time.to_string(),
                    metric.script_evaluation.to_string(),
                    metric.script_parse_time.to_string(),
                    status,
                    quoting.quoted(""),
                ]
                .join(","),
            );
        }
    }

    lines.join("\n")
}
