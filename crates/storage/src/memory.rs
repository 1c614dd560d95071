//! In-memory storage implementation.

use std::collections::HashMap;
use learnpath_core::{ProgressSnapshot, Student, StudentId};
use super::trait_::sort_chronologically;
use super::{Storage, StorageError, Result};

/// Volatile storage backend, useful for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    students: HashMap<StudentId, Student>,
    snapshots: HashMap<StudentId, Vec<ProgressSnapshot>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn save_student(&mut self, student: &Student) -> Result<()> {
        self.students.insert(student.id, student.clone());
        Ok(())
    }

    async fn load_student(&self, id: StudentId) -> Result<Option<Student>> {
        Ok(self.students.get(&id).cloned())
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let mut students: Vec<Student> = self.students.values().cloned().collect();
        students.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(students)
    }

    async fn delete_student(&mut self, id: StudentId) -> Result<()> {
        self.students.remove(&id);
        self.snapshots.remove(&id);
        Ok(())
    }

    async fn save_snapshot(&mut self, snapshot: &ProgressSnapshot) -> Result<()> {
        if !self.students.contains_key(&snapshot.student_id) {
            return Err(StorageError::NotFound(format!("student {}", snapshot.student_id)));
        }
        let history = self.snapshots.entry(snapshot.student_id).or_default();
        history.retain(|s| s.id != snapshot.id);
        history.push(snapshot.clone());
        Ok(())
    }

    async fn list_snapshots(&self, student_id: StudentId) -> Result<Vec<ProgressSnapshot>> {
        let mut history = self.snapshots.get(&student_id).cloned().unwrap_or_default();
        sort_chronologically(&mut history);
        Ok(history)
    }
}
