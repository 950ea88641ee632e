//! In-memory task store.
//!
//! [`InMemoryTaskStore`] keeps records in a `DashMap` keyed by task id.
//! It contains no lifecycle logic; it is the reference [`TaskStore`]
//! collaborator for tests and single-process embedders.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::TaskRecord;
use crate::error::TaskError;
use crate::types::task::TaskStatus;

use super::TaskStore;

/// Thread-safe in-memory store using [`DashMap`] for shard-level locking.
///
/// `save` replaces whole records, so interleaved writers observe
/// last-writer-wins per task, matching the store contract.
///
/// # Examples
///
/// ```
/// use taskforge::InMemoryTaskStore;
///
/// let store = InMemoryTaskStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    records: DashMap<String, TaskRecord>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records stored.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store contains no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn snapshot_sorted(&self, filter: impl Fn(&TaskRecord) -> bool) -> Vec<TaskRecord> {
        let mut records: Vec<TaskRecord> = self
            .records
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save(&self, record: TaskRecord) -> Result<TaskRecord, TaskError> {
        self.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, task_id: &str) -> Result<Option<TaskRecord>, TaskError> {
        Ok(self.records.get(task_id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> Result<Vec<TaskRecord>, TaskError> {
        Ok(self.snapshot_sorted(|_| true))
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<TaskRecord>, TaskError> {
        Ok(self.snapshot_sorted(|record| record.status == status))
    }

    async fn delete_by_id(&self, task_id: &str) -> Result<bool, TaskError> {
        Ok(self.records.remove(task_id).is_some())
    }

    async fn delete_all(&self, task_ids: &[String]) -> Result<usize, TaskError> {
        let mut removed = 0;
        for task_id in task_ids {
            if self.records.remove(task_id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::draft::TaskDraft;
    use crate::types::task::TaskType;

    fn record(name: &str) -> TaskRecord {
        TaskRecord::new(
            TaskDraft::new(name, TaskType::Counter)
                .with_parameter("x", "1")
                .with_parameter("y", "3"),
        )
    }

    #[tokio::test]
    async fn save_and_find_by_id() {
        let store = InMemoryTaskStore::new();
        let stored = store.save(record("a")).await.unwrap();

        let found = store.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(found.id, stored.id);
        assert_eq!(found.name, "a");
    }

    #[tokio::test]
    async fn find_by_id_absent_is_none() {
        let store = InMemoryTaskStore::new();
        assert!(store.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_whole_record() {
        let store = InMemoryTaskStore::new();
        let mut stored = store.save(record("a")).await.unwrap();

        stored.status = TaskStatus::Running;
        stored.progress = 40;
        store.save(stored.clone()).await.unwrap();

        let found = store.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(found.status, TaskStatus::Running);
        assert_eq!(found.progress, 40);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let store = InMemoryTaskStore::new();
        let mut running = record("running");
        running.status = TaskStatus::Running;
        store.save(running.clone()).await.unwrap();
        store.save(record("pending")).await.unwrap();

        let found = store.find_by_status(TaskStatus::Running).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, running.id);

        let none = store.find_by_status(TaskStatus::Completed).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn find_all_ordered_by_creation() {
        let store = InMemoryTaskStore::new();
        let first = store.save(record("first")).await.unwrap();
        let second = store.save(record("second")).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at <= all[1].created_at);
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert!(ids.contains(&first.id.as_str()));
        assert!(ids.contains(&second.id.as_str()));
    }

    #[tokio::test]
    async fn delete_by_id_is_idempotent() {
        let store = InMemoryTaskStore::new();
        let stored = store.save(record("a")).await.unwrap();

        assert!(store.delete_by_id(&stored.id).await.unwrap());
        assert!(!store.delete_by_id(&stored.id).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_all_counts_removed() {
        let store = InMemoryTaskStore::new();
        let a = store.save(record("a")).await.unwrap();
        let b = store.save(record("b")).await.unwrap();
        store.save(record("kept")).await.unwrap();

        let ids = vec![a.id, b.id, "absent".to_string()];
        assert_eq!(store.delete_all(&ids).await.unwrap(), 2);
        assert_eq!(store.len(), 1);
    }
}
