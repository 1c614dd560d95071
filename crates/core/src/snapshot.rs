//! Progress snapshot model - one recorded assessment session.

use serde::{Deserialize, Serialize};
use crate::id::{ClusterId, SnapshotId, StudentId};
use crate::score::ScorePair;
use crate::Time;

/// A point-in-time observation of one student's performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Unique identifier
    pub id: SnapshotId,

    /// Owning student
    pub student_id: StudentId,

    /// When it was recorded
    pub timestamp: Time,

    /// Topic label for the session
    pub topic: String,

    /// Scores at the time of recording
    pub scores: ScorePair,

    /// Engagement count (clicks) during the session
    pub clicks: u32,

    /// Cluster computed when the snapshot was saved
    pub cluster: Option<ClusterId>,
}

impl ProgressSnapshot {
    /// Create a snapshot stamped with the current time.
    pub fn new(student_id: StudentId, scores: ScorePair, clicks: u32) -> Self {
        Self {
            id: SnapshotId::new(),
            student_id,
            timestamp: chrono::Utc::now(),
            topic: "General".to_string(),
            scores,
            clicks,
            cluster: None,
        }
    }

    /// Set the topic label.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Record the cluster assigned at save time.
    pub fn with_cluster(mut self, cluster: ClusterId) -> Self {
        self.cluster = Some(cluster);
        self
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp: Time) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_defaults() {
        let snapshot = ProgressSnapshot::new(StudentId::new(), ScorePair::new(70.0, 65.0), 300);
        assert_eq!(snapshot.topic, "General");
        assert!(snapshot.cluster.is_none());
        assert_eq!(snapshot.clicks, 300);
    }

    #[test]
    fn test_snapshot_builders() {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let snapshot = ProgressSnapshot::new(StudentId::new(), ScorePair::new(70.0, 65.0), 10)
            .with_topic("Algebra")
            .with_cluster(ClusterId(1))
            .at(ts);
        assert_eq!(snapshot.topic, "Algebra");
        assert_eq!(snapshot.cluster, Some(ClusterId(1)));
        assert_eq!(snapshot.timestamp, ts);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = ProgressSnapshot::new(StudentId::new(), ScorePair::new(80.0, 75.0), 5)
            .with_cluster(ClusterId(2));
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["scores"]["math"], 80.0);
        assert_eq!(value["cluster"], 2);
    }
}
