//! State module for tracking batch progress
//!
//! This module provides state management for the audit runner and the
//! snapshots it publishes while a batch is in progress.
//!
//! # Components
//!
//! - `RunState`: Lifecycle of the runner (idle, running, completed)
//! - `ItemPhase`: Request-await-record cycle of the current URL
//! - `ProgressState`: Snapshot of index, URL, ETA and completion
//! - `CancelHandle`: Cooperative cancellation checked between URLs

mod progress;
mod run_state;

// Re-export main types
pub use progress::{format_eta, CancelHandle, ProgressState};
pub use run_state::{ItemPhase, RunState};
