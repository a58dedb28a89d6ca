//! gtm-audit: Google Tag Manager performance auditing
//!
//! This crate drives a batch of URLs, one at a time, through an audit
//! backend that measures the CPU and script time of the GTM containers on
//! each page, then summarizes and exports the results.

pub mod audit;
pub mod config;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for gtm-audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Please enter at least one valid URL (starting with http:// or https://)")]
    NoValidUrls,

    #[error("An audit batch is already running")]
    AlreadyRunning,

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for gtm-audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use audit::{AuditResult, AuditRunner, AuditService, BatchOutcome, GtmMetric};
pub use config::Config;
pub use output::AuditSummary;
pub use state::{ProgressState, RunState};
pub use url::validate_urls;
