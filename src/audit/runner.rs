//! Audit runner - batch orchestration logic
//!
//! This module contains the batch loop that drives validated URLs through
//! the audit service one at a time, including:
//! - Rejecting a batch while another one is running
//! - Publishing progress and ETA snapshots before each dispatch
//! - Recording failures as error results instead of aborting
//! - Honoring cancellation between URLs
//! - Computing the summary once the batch completes

use crate::audit::eta::EtaEstimator;
use crate::audit::service::AuditService;
use crate::audit::types::{AuditFailure, AuditResult};
use crate::config::RunnerConfig;
use crate::output::AuditSummary;
use crate::state::{CancelHandle, ItemPhase, ProgressState, RunState};
use crate::url::{validate_urls, ValidationWarning};
use crate::AuditError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Everything a completed batch produced
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// One result per validated URL, in input order
    pub results: Vec<AuditResult>,

    /// Summary of `results`
    pub summary: AuditSummary,

    /// Set when some input lines were rejected by validation
    pub warning: Option<ValidationWarning>,

    /// True if the batch was cancelled before every URL was dispatched
    pub cancelled: bool,
}

/// Sequential audit runner
///
/// The runner can be shared behind an `Arc`: one task drives a batch while
/// others read progress, results and summary.
pub struct AuditRunner {
    service: Arc<dyn AuditService>,
    seed_seconds_per_item: u64,
    item_timeout: Option<Duration>,

    running: AtomicBool,
    state: RwLock<RunState>,
    results: RwLock<Vec<AuditResult>>,
    summary: RwLock<Option<AuditSummary>>,
    progress: watch::Sender<ProgressState>,
    cancel: CancelHandle,
}

impl AuditRunner {
    /// Creates a new runner instance
    ///
    /// # Arguments
    ///
    /// * `service` - The audit backend every URL is sent to
    /// * `config` - ETA seed and per-item timeout
    pub fn new(service: Arc<dyn AuditService>, config: &RunnerConfig) -> Self {
        let (progress, _) = watch::channel(ProgressState::default());

        Self {
            service,
            seed_seconds_per_item: config.initial_seconds_per_url,
            item_timeout: config.item_timeout.map(Duration::from_secs),
            running: AtomicBool::new(false),
            state: RwLock::new(RunState::Idle),
            results: RwLock::new(Vec::new()),
            summary: RwLock::new(None),
            progress,
            cancel: CancelHandle::new(),
        }
    }

    /// Overrides the per-item timeout
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = Some(timeout);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        *read(&self.state)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Latest progress snapshot
    pub fn progress(&self) -> ProgressState {
        self.progress.borrow().clone()
    }

    /// Subscribes to progress snapshots
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.progress.subscribe()
    }

    /// Results of the last completed batch
    pub fn results(&self) -> Vec<AuditResult> {
        read(&self.results).clone()
    }

    /// Summary of the last completed batch
    pub fn summary(&self) -> Option<AuditSummary> {
        read(&self.summary).clone()
    }

    /// Handle that stops the running batch after its current URL
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Validates `raw` and audits every accepted URL in order
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOutcome)` - The batch ran to completion (individual URLs may have failed)
    /// * `Err(AuditError::NoValidUrls)` - No line of `raw` was an absolute http(s) URL
    /// * `Err(AuditError::AlreadyRunning)` - Another batch is in progress
    pub async fn start_batch(&self, raw: &str) -> Result<BatchOutcome, AuditError> {
        let (urls, warning) = validate_urls(raw).into_batch()?;

        let _guard = self.claim()?;

        if let Some(warning) = &warning {
            warn!("{}", warning);
        }

        self.transition(RunState::Running)?;
        self.cancel.reset();
        write(&self.results).clear();
        *write(&self.summary) = None;

        let (results, cancelled) = self.run_items(&urls).await;
        let summary = AuditSummary::from_results(&results);

        *write(&self.results) = results.clone();
        *write(&self.summary) = Some(summary.clone());
        self.progress.send_modify(|p| {
            p.current_url.clear();
            p.estimated_seconds_remaining = 0;
            p.phase = None;
        });
        self.transition(RunState::Completed)?;

        info!(
            "Batch completed: {} URLs, {} successful, {} containers",
            summary.total_urls, summary.successful_audits, summary.total_containers
        );

        Ok(BatchOutcome {
            results,
            summary,
            warning,
            cancelled,
        })
    }

    /// Drops the last batch's results and resets progress
    ///
    /// Rejected with `AlreadyRunning` while a batch is in progress.
    pub fn clear(&self) -> Result<(), AuditError> {
        let _guard = self.claim()?;

        write(&self.results).clear();
        *write(&self.summary) = None;
        self.progress.send_replace(ProgressState::default());
        self.transition(RunState::Idle)?;

        debug!("Cleared batch state");
        Ok(())
    }

    /// Runs the request-await-record cycle for each URL
    async fn run_items(&self, urls: &[String]) -> (Vec<AuditResult>, bool) {
        let total = urls.len();
        let started = Instant::now();
        let mut eta = EtaEstimator::start(total, self.seed_seconds_per_item);
        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        self.progress.send_replace(ProgressState {
            total_urls: total,
            estimated_seconds_remaining: eta.estimate_remaining(),
            ..ProgressState::default()
        });

        info!("Starting audit of {} URLs", total);

        for (index, url) in urls.iter().enumerate() {
            if !cancelled && self.cancel.is_cancelled() {
                warn!("Batch cancelled, {} URLs left unaudited", total - index);
                cancelled = true;
            }

            let result = if cancelled {
                AuditResult::failed(url.as_str(), AuditFailure::Cancelled.to_string())
            } else {
                let remaining = eta.estimate_remaining();
                self.progress.send_modify(|p| {
                    p.current_index = index + 1;
                    p.current_url = url.clone();
                    p.estimated_seconds_remaining = remaining;
                    p.phase = Some(ItemPhase::Dispatching);
                });
                debug!("[{}/{}] Dispatching {}", index + 1, total, url);

                self.advance_phase();
                self.audit_one(url).await
            };

            results.push(result);
            eta.record_completion();

            let percent = (index + 1) as f64 / total as f64 * 100.0;
            self.progress.send_modify(|p| {
                p.current_index = index + 1;
                p.percent_complete = percent;
                p.phase = Some(ItemPhase::Recorded);
            });
        }

        info!(
            "Audited {} URLs in {:.1}s",
            results.len(),
            started.elapsed().as_secs_f64()
        );

        (results, cancelled)
    }

    /// Audits one URL, turning every failure into an error result
    async fn audit_one(&self, url: &str) -> AuditResult {
        let outcome = match self.item_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.service.audit_url(url))
                .await
                .unwrap_or(Err(AuditFailure::TimedOut { timeout })),
            None => self.service.audit_url(url).await,
        };

        match outcome {
            Ok(result) => {
                let result = result.normalized(url);
                info!(
                    "Audited {}: {} ({} containers)",
                    url,
                    result.status,
                    result.gtm_metrics.len()
                );
                result
            }
            Err(failure) => {
                warn!("Audit failed for {}: {}", url, failure);
                AuditResult::failed(url, failure.to_string())
            }
        }
    }

    /// Moves the current item to its next phase
    fn advance_phase(&self) {
        self.progress
            .send_modify(|p| p.phase = p.phase.and_then(|phase| phase.next()));
    }

    fn transition(&self, next: RunState) -> Result<(), AuditError> {
        let mut state = write(&self.state);
        if !state.can_transition_to(next) {
            return Err(AuditError::InvalidTransition {
                from: *state,
                to: next,
            });
        }
        *state = next;
        Ok(())
    }

    /// Marks the runner busy until the returned guard is dropped
    fn claim(&self) -> Result<RunGuard<'_>, AuditError> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Audit batch already running");
            return Err(AuditError::AlreadyRunning);
        }
        Ok(RunGuard {
            running: &self.running,
            state: &self.state,
        })
    }
}

/// Releases the runner, including when a batch future is dropped mid-run
struct RunGuard<'a> {
    running: &'a AtomicBool,
    state: &'a RwLock<RunState>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut state = write(self.state);
        if state.is_running() {
            *state = RunState::Idle;
        }
        self.running.store(false, Ordering::SeqCst);
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
