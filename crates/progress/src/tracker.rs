//! Engagement signals and history summaries.

use learnpath_core::{ProgressSnapshot, Subject, Time};
use serde::{Deserialize, Serialize};

use crate::config::ProgressConfig;

/// Engagement classification for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementLevel {
    /// Clicks below the configured threshold
    Low,
    /// Clicks at or above the threshold
    Normal,
}

impl EngagementLevel {
    /// Nudge shown for low engagement.
    pub fn nudge(&self) -> Option<&'static str> {
        match self {
            EngagementLevel::Low => Some("Low engagement detected: try one short video today!"),
            EngagementLevel::Normal => None,
        }
    }
}

/// Classify the engagement of one snapshot.
pub fn engagement_level(snapshot: &ProgressSnapshot, config: &ProgressConfig) -> EngagementLevel {
    if snapshot.clicks < config.low_engagement_threshold {
        EngagementLevel::Low
    } else {
        EngagementLevel::Normal
    }
}

/// Aggregate view of a student's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    /// Number of recorded sessions
    pub sessions: usize,

    /// Timestamp of the first snapshot
    pub first_at: Option<Time>,

    /// Timestamp of the last snapshot
    pub last_at: Option<Time>,

    /// Mean math score
    pub mean_math: f64,

    /// Mean reading score
    pub mean_reading: f64,

    /// Best score on the tracked subject
    pub best: Option<f64>,

    /// Mean clicks per session
    pub mean_clicks: f64,
}

/// Summarize an ordered history, taking `best` from `subject`.
pub fn summarize(history: &[ProgressSnapshot], subject: Subject) -> HistorySummary {
    let sessions = history.len();
    if sessions == 0 {
        return HistorySummary {
            sessions: 0,
            first_at: None,
            last_at: None,
            mean_math: 0.0,
            mean_reading: 0.0,
            best: None,
            mean_clicks: 0.0,
        };
    }

    let n = sessions as f64;
    let mean_math = history.iter().map(|s| s.scores.math).sum::<f64>() / n;
    let mean_reading = history.iter().map(|s| s.scores.reading).sum::<f64>() / n;
    let mean_clicks = history.iter().map(|s| s.clicks as f64).sum::<f64>() / n;
    let best = history
        .iter()
        .map(|s| s.scores.get(subject))
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

    HistorySummary {
        sessions,
        first_at: history.first().map(|s| s.timestamp),
        last_at: history.last().map(|s| s.timestamp),
        mean_math,
        mean_reading,
        best,
        mean_clicks,
    }
}
