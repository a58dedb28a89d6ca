//! In-memory audit service
//!
//! Serves scripted responses without any network or browser, and records
//! every call so the sequencing of a batch can be asserted on.

use crate::audit::service::AuditService;
use crate::audit::types::{AuditFailure, AuditResult, GtmMetric};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Audit service answering from a table of scripted responses
///
/// URLs without a scripted response succeed with no containers.
#[derive(Debug, Default)]
pub struct InMemoryAuditService {
    responses: Mutex<HashMap<String, Result<AuditResult, AuditFailure>>>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InMemoryAuditService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every response, simulating a slow measurement session
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Scripts a successful audit for `url` with the given containers
    pub fn with_metrics(self, url: &str, metrics: Vec<GtmMetric>) -> Self {
        self.set_response(url, Ok(AuditResult::succeeded(url, metrics)));
        self
    }

    /// Scripts a failure for `url`
    pub fn with_failure(self, url: &str, failure: AuditFailure) -> Self {
        self.set_response(url, Err(failure));
        self
    }

    /// Replaces the scripted response for `url`
    pub fn set_response(&self, url: &str, response: Result<AuditResult, AuditFailure>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(url.to_string(), response);
        }
    }

    /// URLs audited so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Highest number of audits that were in flight at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditService for InMemoryAuditService {
    async fn audit_url(&self, url: &str) -> Result<AuditResult, AuditFailure> {
        let _guard = InFlightGuard::enter(&self.in_flight, &self.max_in_flight);

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.responses.lock().ok().and_then(|r| r.get(url).cloned());
        scripted.unwrap_or_else(|| Ok(AuditResult::succeeded(url, Vec::new())))
    }
}

/// Keeps the in-flight count accurate even when a call is dropped mid-await
struct InFlightGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> InFlightGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize, max_in_flight: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
