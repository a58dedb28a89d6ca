/// Run and item state definitions for tracking batch progress
///
/// A batch moves `Idle -> Running -> Completed`; while running, each URL
/// moves `Dispatching -> AwaitingResult -> Recorded`.
use std::fmt;

/// Lifecycle of the audit runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// No batch has started since the last clear
    #[default]
    Idle,

    /// A batch is being processed
    Running,

    /// The last batch finished and its results are available
    Completed,
}

impl RunState {
    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// A completed runner may start a new batch without being cleared, and
    /// clearing is allowed from any state except `Running`.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Completed, Self::Running)
                | (Self::Completed, Self::Idle)
                | (Self::Idle, Self::Idle)
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the current URL is within its request-await-record cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemPhase {
    /// Progress updated, request about to be sent
    Dispatching,

    /// Request sent, waiting for the audit backend
    AwaitingResult,

    /// Result (or failure) appended to the result list
    Recorded,
}

impl ItemPhase {
    /// The phase that follows this one for the same item, if any
    pub fn next(&self) -> Option<ItemPhase> {
        match self {
            Self::Dispatching => Some(Self::AwaitingResult),
            Self::AwaitingResult => Some(Self::Recorded),
            Self::Recorded => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dispatching => "dispatching",
            Self::AwaitingResult => "awaiting_result",
            Self::Recorded => "recorded",
        }
    }
}

impl fmt::Display for ItemPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
