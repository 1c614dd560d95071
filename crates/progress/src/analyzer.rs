//! Trend analysis over a student's snapshot history.

use learnpath_core::{ProgressSnapshot, Subject};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::format_points;

/// Direction of the most recent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    /// Fewer than two snapshots
    InsufficientHistory,
    /// Score went up
    Improving,
    /// Score went down
    Declining,
    /// Score unchanged
    Stable,
}

impl Trend {
    /// Classify a velocity by its sign.
    pub fn from_velocity(velocity: f64) -> Self {
        if velocity > 0.0 {
            Trend::Improving
        } else if velocity < 0.0 {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::InsufficientHistory => "InsufficientHistory",
            Trend::Improving => "Improving",
            Trend::Declining => "Declining",
            Trend::Stable => "Stable",
        }
    }
}

/// Result of analyzing a history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Trend classification
    pub trend: Trend,

    /// Latest score minus the one before it (0 without enough history)
    pub velocity: f64,

    /// Score of the most recent snapshot (0 without enough history)
    pub latest_score: f64,

    /// Subject the scores were taken from
    pub subject: Subject,
}

impl TrendReport {
    fn insufficient(subject: Subject) -> Self {
        Self {
            trend: Trend::InsufficientHistory,
            velocity: 0.0,
            latest_score: 0.0,
            subject,
        }
    }

    /// Display-ready sentence for the trend.
    pub fn message(&self) -> String {
        match self.trend {
            Trend::InsufficientHistory => "Not enough history yet.".to_string(),
            Trend::Improving => format!(
                "Improving! You gained {} points since last time.",
                format_points(self.velocity)
            ),
            Trend::Declining => format!(
                "Warning: Score dropped by {}. Review requested.",
                format_points(self.velocity.abs())
            ),
            Trend::Stable => "Stable: No change in performance.".to_string(),
        }
    }
}

impl std::fmt::Display for TrendReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Analyze the math trend of a chronologically ordered history.
///
/// Position decides recency: the last element is the latest snapshot.
/// Callers must sort by timestamp before calling.
pub fn analyze_patterns(history: &[ProgressSnapshot]) -> TrendReport {
    analyze_subject(history, Subject::Math)
}

/// Analyze the trend of `subject` over a chronologically ordered history.
pub fn analyze_subject(history: &[ProgressSnapshot], subject: Subject) -> TrendReport {
    let [.., previous, latest] = history else {
        debug!(len = history.len(), "not enough history for trend analysis");
        return TrendReport::insufficient(subject);
    };

    let latest_score = latest.scores.get(subject);
    let velocity = latest_score - previous.scores.get(subject);
    let trend = Trend::from_velocity(velocity);

    debug!(
        subject = subject.as_str(),
        velocity,
        latest_score,
        trend = trend.as_str(),
        "analyzed progress trend"
    );

    TrendReport {
        trend,
        velocity,
        latest_score,
        subject,
    }
}
