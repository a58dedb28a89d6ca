use crate::audit::DEFAULT_SECONDS_PER_URL;
use crate::output::CsvQuoting;
use serde::Deserialize;

/// Main configuration structure for gtm-audit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Audit backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// URL of the audit endpoint receiving `POST { "url": ... }`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_version")]
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

/// Batch runner configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// Placeholder duration per URL used for the ETA before any URL finishes
    #[serde(
        rename = "initial-seconds-per-url",
        default = "default_initial_seconds_per_url"
    )]
    pub initial_seconds_per_url: u64,

    /// Upper bound on a single audit (seconds); unbounded when absent
    #[serde(rename = "item-timeout", default)]
    pub item_timeout: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            initial_seconds_per_url: default_initial_seconds_per_url(),
            item_timeout: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the dated CSV export is written to
    #[serde(default = "default_directory")]
    pub directory: String,

    /// File name prefix of the CSV export
    #[serde(rename = "file-prefix", default = "default_file_prefix")]
    pub file_prefix: String,

    /// Quoting rules for the CSV export
    #[serde(rename = "csv-quoting", default)]
    pub csv_quoting: CsvQuoting,

    /// Path of the markdown report; no report is written when absent
    #[serde(rename = "report-path", default)]
    pub report_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_prefix: default_file_prefix(),
            csv_quoting: CsvQuoting::default(),
            report_path: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:3000/api/audit".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_agent_name() -> String {
    "gtm-audit".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_initial_seconds_per_url() -> u64 {
    DEFAULT_SECONDS_PER_URL
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_file_prefix() -> String {
    crate::output::DEFAULT_EXPORT_PREFIX.to_string()
}
