//! Session count estimation towards a target score.

use serde::{Deserialize, Serialize};

use crate::analyzer::TrendReport;
use crate::format_points;

/// Outcome of projecting the current trend onto a target score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalProjection {
    /// Velocity is not positive, so the target cannot be reached by extrapolation
    Unreachable,
    /// The current score is already at or above the target
    AlreadyMet,
    /// Additional sessions needed at the current rate (always >= 1)
    Sessions(u32),
}

impl GoalProjection {
    /// Sessions needed, if a positive count was projected.
    pub fn sessions(&self) -> Option<u32> {
        match self {
            GoalProjection::Sessions(n) => Some(*n),
            _ => None,
        }
    }

    /// Display-ready sentence for this projection towards `target`.
    pub fn message(&self, target: f64) -> String {
        let target = format_points(target);
        match self {
            GoalProjection::Unreachable => format!(
                "No projection to {} points: the score is not currently improving.",
                target
            ),
            GoalProjection::AlreadyMet => {
                format!("Goal of {} points already met.", target)
            }
            GoalProjection::Sessions(n) => format!(
                "To reach {} points, you need about {} more sessions at this rate.",
                target, n
            ),
        }
    }
}

/// Project how many more sessions reach `target_score` at `velocity` per session.
///
/// A partial session rounds up to a full one. A non-positive velocity yields
/// `Unreachable` before the target is considered; a target at or below the
/// current score yields `AlreadyMet`.
pub fn goal_prediction(current_score: f64, velocity: f64, target_score: f64) -> GoalProjection {
    if velocity.is_nan() || velocity <= 0.0 {
        return GoalProjection::Unreachable;
    }

    let sessions = ((target_score - current_score) / velocity).ceil();
    if sessions.is_nan() {
        return GoalProjection::Unreachable;
    }
    if sessions <= 0.0 {
        return GoalProjection::AlreadyMet;
    }

    // Float-to-int `as` saturates at u32::MAX.
    GoalProjection::Sessions(sessions as u32)
}

/// Goal projection with a configured target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionEstimator {
    target_score: f64,
}

impl SessionEstimator {
    /// Create an estimator for `target_score`.
    pub fn new(target_score: f64) -> Self {
        Self { target_score }
    }

    /// Target score in use.
    pub fn target(&self) -> f64 {
        self.target_score
    }

    /// Project the sessions needed from a trend report.
    pub fn estimate(&self, report: &TrendReport) -> GoalProjection {
        goal_prediction(report.latest_score, report.velocity, self.target_score)
    }
}

impl Default for SessionEstimator {
    fn default() -> Self {
        Self::new(crate::ProgressConfig::default().target_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Trend;
    use learnpath_core::Subject;

    #[test]
    fn test_exact_division() {
        assert_eq!(goal_prediction(70.0, 5.0, 90.0), GoalProjection::Sessions(4));
    }

    #[test]
    fn test_partial_session_rounds_up() {
        assert_eq!(goal_prediction(70.0, 3.0, 90.0), GoalProjection::Sessions(7));
        assert_eq!(goal_prediction(89.5, 10.0, 90.0), GoalProjection::Sessions(1));
    }

    #[test]
    fn test_non_positive_velocity() {
        assert_eq!(goal_prediction(70.0, 0.0, 90.0), GoalProjection::Unreachable);
        assert_eq!(goal_prediction(70.0, -2.0, 90.0), GoalProjection::Unreachable);
        assert_eq!(goal_prediction(95.0, -2.0, 90.0), GoalProjection::Unreachable);
        assert_eq!(goal_prediction(70.0, f64::NAN, 90.0), GoalProjection::Unreachable);
    }

    #[test]
    fn test_target_already_met() {
        assert_eq!(goal_prediction(95.0, 5.0, 90.0), GoalProjection::AlreadyMet);
        assert_eq!(goal_prediction(90.0, 5.0, 90.0), GoalProjection::AlreadyMet);
        assert_eq!(goal_prediction(95.0, 5.0, 90.0).sessions(), None);
    }

    #[test]
    fn test_huge_gap_saturates() {
        assert_eq!(goal_prediction(0.0, 1e-12, 90.0), GoalProjection::Sessions(u32::MAX));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            GoalProjection::Sessions(4).message(90.0),
            "To reach 90 points, you need about 4 more sessions at this rate."
        );
        assert_eq!(GoalProjection::AlreadyMet.message(90.0), "Goal of 90 points already met.");
        assert!(GoalProjection::Unreachable.message(90.0).starts_with("No projection"));
    }

    #[test]
    fn test_estimator_uses_report() {
        let report = TrendReport {
            trend: Trend::Improving,
            velocity: 3.0,
            latest_score: 70.0,
            subject: Subject::Math,
        };
        assert_eq!(SessionEstimator::default().target(), 90.0);
        assert_eq!(SessionEstimator::default().estimate(&report), GoalProjection::Sessions(7));
        assert_eq!(SessionEstimator::new(76.0).estimate(&report), GoalProjection::Sessions(2));
    }
}
