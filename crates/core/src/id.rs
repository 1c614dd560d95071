//! Unique identifiers for LearnPath entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a Student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(Ulid);

impl StudentId {
    /// Generate a new StudentId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for StudentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for StudentId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a ProgressSnapshot
///
/// Ordered by creation time, which breaks ties between equal timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotId(Ulid);

impl SnapshotId {
    /// Generate a new SnapshotId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Behavioral group label produced by the cohort clusterer.
///
/// Always drawn from `0..k` of the clustering pass that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub usize);

impl ClusterId {
    /// Raw label value.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_id_roundtrip_through_string() {
        let id = StudentId::new();
        let parsed: StudentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_student_id_rejects_garbage() {
        assert!("not-a-ulid".parse::<StudentId>().is_err());
    }

    #[test]
    fn test_cluster_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&ClusterId(2)).unwrap();
        assert_eq!(json, "2");
    }
}
