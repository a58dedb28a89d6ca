//! Audit module for driving URLs through the audit backend
//!
//! This module contains the core orchestration logic, including:
//! - The audit service abstraction and its HTTP implementation
//! - An in-memory service for tests and offline runs
//! - ETA estimation
//! - The sequential batch runner

mod eta;
mod memory;
mod runner;
mod service;
mod types;

pub use eta::{EtaEstimator, DEFAULT_SECONDS_PER_URL};
pub use memory::InMemoryAuditService;
pub use runner::{AuditRunner, BatchOutcome};
pub use service::{build_http_client, AuditService, HttpAuditService};
pub use types::{AuditFailure, AuditResult, AuditStatus, GtmMetric};
