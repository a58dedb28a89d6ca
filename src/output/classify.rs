//! Performance tiers for container timings
//!
//! Classification is display metadata only; metric values are never changed.

use std::fmt;

/// Which threshold table a value is judged against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Total CPU time
    Cpu,
    /// Script evaluation or parse time
    Script,
}

/// Severity tier of a timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PerformanceTier {
    Good,
    Warning,
    Critical,
}

impl MetricKind {
    /// Upper bounds (inclusive, milliseconds) of the good and warning tiers
    pub fn thresholds(&self) -> (f64, f64) {
        match self {
            Self::Cpu => (500.0, 1000.0),
            Self::Script => (200.0, 500.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU Time",
            Self::Script => "Script Times (Evaluation / Parse)",
        }
    }
}

impl PerformanceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a timing to its tier; boundary values belong to the lower tier
pub fn classify(value: f64, kind: MetricKind) -> PerformanceTier {
    let (good, warning) = kind.thresholds();

    if value <= good {
        PerformanceTier::Good
    } else if value <= warning {
        PerformanceTier::Warning
    } else {
        PerformanceTier::Critical
    }
}
