//! Progress Analysis
//!
//! Trend detection, goal projection and engagement signals over one
//! student's chronologically ordered snapshot history.

#![warn(missing_docs)]

pub mod analyzer;
pub mod config;
pub mod estimator;
pub mod tracker;

pub use analyzer::{analyze_patterns, analyze_subject, Trend, TrendReport};
pub use config::ProgressConfig;
pub use estimator::{goal_prediction, GoalProjection, SessionEstimator};
pub use tracker::{engagement_level, summarize, EngagementLevel, HistorySummary};

/// Render a score delta without float noise.
///
/// Keeps ten significant digits, so a non-zero delta never renders as "0".
pub(crate) fn format_points(value: f64) -> String {
    let rounded: f64 = format!("{:.9e}", value).parse().unwrap_or(value);
    // Avoid printing "-0".
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}
