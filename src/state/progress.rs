use crate::state::ItemPhase;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Snapshot of a batch in progress
///
/// The runner publishes whole snapshots, so an observer never sees the
/// URL of one item paired with the index or ETA of another.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressState {
    /// 1-based index of the URL being audited (0 before the first dispatch)
    pub current_index: usize,

    /// Number of validated URLs in the batch
    pub total_urls: usize,

    /// URL currently being audited, empty when none is
    pub current_url: String,

    /// Projected seconds until the batch completes
    pub estimated_seconds_remaining: u64,

    /// Share of URLs recorded so far, 0 to 100
    pub percent_complete: f64,

    /// Phase of the current item, `None` outside of an item
    pub phase: Option<ItemPhase>,
}

impl ProgressState {
    /// Returns true while an item is between dispatch and record
    pub fn is_active(&self) -> bool {
        !self.current_url.is_empty()
    }
}

/// Formats a number of seconds the way the progress line shows it
///
/// Under a minute prints as `45s`, otherwise as `3m 5s`.
pub fn format_eta(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{}s", seconds);
    }
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Cooperative cancellation for a running batch
///
/// The runner checks the handle between items; an audit already in
/// flight is allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Re-arms the handle for the next batch
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}
