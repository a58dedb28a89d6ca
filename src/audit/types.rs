//! Audit result types exchanged with the audit backend
//!
//! The JSON shape mirrors what the backend returns from its audit endpoint:
//! camelCase field names, `status` as a lowercase string and an optional
//! `error` message.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// CPU and script timings for a single GTM container on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtmMetric {
    /// Container identifier (e.g., "GTM-ABC123")
    pub container_id: String,

    /// Total CPU time attributed to the container (milliseconds)
    pub total_cpu_time: f64,

    /// Time spent evaluating the container script (milliseconds)
    pub script_evaluation: f64,

    /// Time spent parsing the container script (milliseconds)
    pub script_parse_time: f64,
}

impl GtmMetric {
    /// Returns true if every timing is a finite, non-negative number
    pub fn is_well_formed(&self) -> bool {
        [
            self.total_cpu_time,
            self.script_evaluation,
            self.script_parse_time,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Outcome of auditing a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Error,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of auditing one URL
///
/// A batch produces exactly one of these per validated URL. An `Error`
/// result never carries metrics; a `Success` result may have none if the
/// page loads no GTM containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub url: String,

    pub status: AuditStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub gtm_metrics: Vec<GtmMetric>,
}

impl AuditResult {
    /// Creates a successful result
    pub fn succeeded(url: impl Into<String>, gtm_metrics: Vec<GtmMetric>) -> Self {
        Self {
            url: url.into(),
            status: AuditStatus::Success,
            error: None,
            gtm_metrics,
        }
    }

    /// Creates a failed result with no metrics
    pub fn failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: AuditStatus::Error,
            error: Some(message.into()),
            gtm_metrics: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Enforces the result invariants on a payload received from a backend
    ///
    /// Error results lose any metrics they carried, and an empty URL is
    /// replaced with the URL that was dispatched.
    pub fn normalized(mut self, requested_url: &str) -> Self {
        if self.url.trim().is_empty() {
            self.url = requested_url.to_string();
        }
        if self.status == AuditStatus::Error {
            self.gtm_metrics.clear();
        }
        self
    }
}

/// Why auditing a single URL failed
///
/// Failures are isolated to their URL: the runner records them as an
/// error result and moves on to the next item.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuditFailure {
    /// The backend answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The backend answered but the payload could not be understood
    #[error("Malformed audit response: {message}")]
    MalformedResponse { message: String },

    /// The request never produced a response
    #[error("{message}")]
    Transport { message: String },

    /// The audit did not finish within the per-item timeout
    #[error("Audit timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    /// The batch was cancelled before this URL was dispatched
    #[error("Audit cancelled")]
    Cancelled,
}

impl AuditFailure {
    /// Returns true for failures talking to the backend (network, timeout, parse)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::MalformedResponse { .. } | Self::TimedOut { .. }
        )
    }
}
