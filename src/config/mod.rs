//! Configuration module for gtm-audit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use gtm_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gtm-audit.toml")).unwrap();
//! println!("Auditing through: {}", config.service.endpoint);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, RunnerConfig, ServiceConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
