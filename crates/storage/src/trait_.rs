//! Storage trait abstraction.

use async_trait::async_trait;
use learnpath_core::{ProgressSnapshot, Student, StudentId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed input data (e.g. a baseline dataset)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Keyed record store for students and their progress history.
///
/// This trait allows different storage backends to be plugged in.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Student operations ===

    /// Save a student (create or update).
    async fn save_student(&mut self, student: &Student) -> Result<()>;

    /// Load a student by ID.
    async fn load_student(&self, id: StudentId) -> Result<Option<Student>>;

    /// List all students.
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// Delete a student and their progress history.
    async fn delete_student(&mut self, id: StudentId) -> Result<()>;

    // === Progress operations ===

    /// Append a snapshot. Fails with `NotFound` if the student does not exist.
    async fn save_snapshot(&mut self, snapshot: &ProgressSnapshot) -> Result<()>;

    /// Snapshots of one student, oldest first.
    ///
    /// A record that cannot be read fails the whole call, since a gap would
    /// silently change which pair a trend is computed from.
    async fn list_snapshots(&self, student_id: StudentId) -> Result<Vec<ProgressSnapshot>>;
}

/// Sort snapshots chronologically; equal timestamps fall back to creation order.
pub(crate) fn sort_chronologically(snapshots: &mut [ProgressSnapshot]) {
    snapshots.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
}
