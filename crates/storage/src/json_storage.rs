//! JSON file storage implementation.
//!
//! Stores each student as `students/<id>.json` and each snapshot as
//! `progress/<student_id>/<snapshot_id>.json` under a root directory.

use std::path::{Path, PathBuf};
use learnpath_core::{ProgressSnapshot, SnapshotId, Student, StudentId};
use super::trait_::sort_chronologically;
use super::{Storage, StorageError, Result};
use tokio::fs;
use tracing::debug;

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directory layout if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("students")).await?;
        fs::create_dir_all(root.join("progress")).await?;

        debug!(root = %root.display(), "opened JSON storage");
        Ok(Self { root })
    }

    fn student_path(&self, id: StudentId) -> PathBuf {
        self.root.join("students").join(format!("{}.json", id))
    }
    fn progress_dir(&self, id: StudentId) -> PathBuf {
        self.root.join("progress").join(id.to_string())
    }
    fn snapshot_path(&self, student: StudentId, id: SnapshotId) -> PathBuf {
        self.progress_dir(student).join(format!("{}.json", id))
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_student(&mut self, student: &Student) -> Result<()> {
        let path = self.student_path(student.id);
        let json = serde_json::to_string_pretty(student)?;
        fs::write(&path, json.as_bytes()).await?;
        fs::create_dir_all(self.progress_dir(student.id)).await?;
        Ok(())
    }

    async fn load_student(&self, id: StudentId) -> Result<Option<Student>> {
        read_json(&self.student_path(id)).await
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let mut students = list_dir(&self.root.join("students")).await?;
        students.sort_by(|a: &Student, b| a.created_at.cmp(&b.created_at));
        Ok(students)
    }

    async fn delete_student(&mut self, id: StudentId) -> Result<()> {
        fs::remove_file(self.student_path(id)).await.or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
        })?;
        fs::remove_dir_all(self.progress_dir(id)).await.or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
        })?;
        Ok(())
    }

    async fn save_snapshot(&mut self, snapshot: &ProgressSnapshot) -> Result<()> {
        if !fs::try_exists(self.student_path(snapshot.student_id)).await? {
            return Err(StorageError::NotFound(format!("student {}", snapshot.student_id)));
        }
        fs::create_dir_all(self.progress_dir(snapshot.student_id)).await?;

        let path = self.snapshot_path(snapshot.student_id, snapshot.id);
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json.as_bytes()).await?;
        Ok(())
    }

    async fn list_snapshots(&self, student_id: StudentId) -> Result<Vec<ProgressSnapshot>> {
        let dir = self.progress_dir(student_id);
        if !fs::try_exists(&dir).await? {
            return Ok(Vec::new());
        }
        let mut snapshots: Vec<ProgressSnapshot> = Vec::new();
        for path in json_entries(&dir).await? {
            if let Some(snapshot) = read_json(&path).await? {
                snapshots.push(snapshot);
            }
        }
        sort_chronologically(&mut snapshots);
        Ok(snapshots)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read every record in `dir`, skipping ones that fail to parse.
async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for path in json_entries(dir).await? {
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable record"),
        }
    }
    Ok(items)
}

async fn json_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnpath_core::ScorePair;

    #[tokio::test]
    async fn test_student_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let student = Student::new("Ada").with_interests("ML");
        storage.save_student(&student).await.unwrap();

        let loaded = storage.load_student(student.id).await.unwrap();
        assert_eq!(loaded, Some(student.clone()));
        assert_eq!(storage.list_students().await.unwrap().len(), 1);
        assert!(storage.load_student(StudentId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshots_listed_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let student = Student::new("Grace");
        storage.save_student(&student).await.unwrap();

        let now = chrono::Utc::now();
        let later = ProgressSnapshot::new(student.id, ScorePair::new(80.0, 70.0), 300)
            .at(now + chrono::Duration::hours(2));
        let earlier = ProgressSnapshot::new(student.id, ScorePair::new(70.0, 65.0), 250).at(now);
        storage.save_snapshot(&later).await.unwrap();
        storage.save_snapshot(&earlier).await.unwrap();

        let history = storage.list_snapshots(student.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, earlier.id);
        assert_eq!(history[1].id, later.id);
    }

    #[tokio::test]
    async fn test_snapshot_requires_student() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let orphan = ProgressSnapshot::new(StudentId::new(), ScorePair::new(1.0, 1.0), 0);
        assert!(matches!(
            storage.save_snapshot(&orphan).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_fails_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let student = Student::new("Kim");
        storage.save_student(&student).await.unwrap();
        storage
            .save_snapshot(&ProgressSnapshot::new(student.id, ScorePair::new(70.0, 60.0), 300))
            .await
            .unwrap();

        let broken = storage.progress_dir(student.id).join(format!("{}.json", SnapshotId::new()));
        fs::write(&broken, "{ not json").await.unwrap();

        assert!(matches!(
            storage.list_snapshots(student.id).await,
            Err(StorageError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_student_is_skipped_in_listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.save_student(&Student::new("Kim")).await.unwrap();
        fs::write(dir.path().join("students").join("junk.json"), "[")
            .await
            .unwrap();

        assert_eq!(storage.list_students().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_histories_are_per_student() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let a = Student::new("A");
        let b = Student::new("B");
        storage.save_student(&a).await.unwrap();
        storage.save_student(&b).await.unwrap();
        storage
            .save_snapshot(&ProgressSnapshot::new(a.id, ScorePair::new(50.0, 50.0), 10))
            .await
            .unwrap();

        assert_eq!(storage.list_snapshots(a.id).await.unwrap().len(), 1);
        assert!(storage.list_snapshots(b.id).await.unwrap().is_empty());
        assert!(storage.list_snapshots(StudentId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_student_removes_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let student = Student::new("Temp");
        storage.save_student(&student).await.unwrap();
        storage
            .save_snapshot(&ProgressSnapshot::new(student.id, ScorePair::new(50.0, 50.0), 10))
            .await
            .unwrap();

        storage.delete_student(student.id).await.unwrap();
        assert!(storage.load_student(student.id).await.unwrap().is_none());
        assert!(storage.list_snapshots(student.id).await.unwrap().is_empty());

        // Deleting again is not an error.
        storage.delete_student(student.id).await.unwrap();
    }
}
