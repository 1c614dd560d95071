//! Progress analysis configuration.

use learnpath_core::Subject;
use serde::{Deserialize, Serialize};

/// Configuration for trend analysis and goal projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Subject whose score drives velocity and projection
    pub subject: Subject,

    /// Score the student is working towards
    pub target_score: f64,

    /// Click count below which a session counts as low engagement
    pub low_engagement_threshold: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            subject: Subject::Math,
            target_score: 90.0,
            low_engagement_threshold: 200,
        }
    }
}

impl ProgressConfig {
    /// Set the tracked subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = subject;
        self
    }

    /// Set the target score.
    pub fn with_target(mut self, target_score: f64) -> Self {
        self.target_score = target_score;
        self
    }

    /// Set the low-engagement threshold.
    pub fn with_engagement_threshold(mut self, clicks: u32) -> Self {
        self.low_engagement_threshold = clicks;
        self
    }
}
