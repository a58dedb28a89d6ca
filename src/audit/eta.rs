//! Remaining-time estimation for a running batch
//!
//! Until the first URL finishes, the estimate is a placeholder derived from
//! a fixed per-URL guess. After that it is a running average of the measured
//! wall-clock time per completed URL.

use std::time::{Duration, Instant};

/// Default placeholder duration per URL before any measurement exists
pub const DEFAULT_SECONDS_PER_URL: u64 = 20;

/// Tracks batch progress and projects the remaining time
#[derive(Debug, Clone)]
pub struct EtaEstimator {
    started_at: Instant,
    total: usize,
    completed: usize,
    seed_seconds_per_item: u64,
}

impl EtaEstimator {
    /// Starts estimating for a batch of `total` items
    pub fn start(total: usize, seed_seconds_per_item: u64) -> Self {
        Self {
            started_at: Instant::now(),
            total,
            completed: 0,
            seed_seconds_per_item,
        }
    }

    /// Records that one more item has finished (successfully or not)
    pub fn record_completion(&mut self) {
        self.completed = (self.completed + 1).min(self.total);
    }

    /// Projects the remaining seconds using the real elapsed time
    pub fn estimate_remaining(&self) -> u64 {
        self.estimate_with_elapsed(self.started_at.elapsed())
    }

    /// Projects the remaining seconds given an elapsed duration
    pub fn estimate_with_elapsed(&self, elapsed: Duration) -> u64 {
        if self.completed == 0 {
            return (self.total as u64).saturating_mul(self.seed_seconds_per_item);
        }

        let average_per_item = elapsed.as_secs_f64() / self.completed as f64;
        let remaining_items = self.total.saturating_sub(self.completed) as f64;
        let remaining = (remaining_items * average_per_item).round();

        if remaining.is_finite() && remaining > 0.0 {
            remaining as u64
        } else {
            0
        }
    }
}
