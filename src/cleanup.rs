//! Periodic removal of stale pending tasks.
//!
//! Tasks created but never executed accumulate; the sweeper deletes
//! `Pending` records older than a retention window. It only ever touches
//! `Pending` records -- anything that has run, finished, or failed is
//! left alone.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::error::TaskError;
use crate::store::TaskStore;
use crate::types::task::TaskStatus;

/// How long a pending task is kept before the sweep deletes it.
pub const DEFAULT_RETENTION_DAYS: i64 = 20;

/// How often the background sweep runs.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// Deletes pending tasks that outlived the retention window.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use taskforge::{InMemoryTaskStore, StaleTaskSweeper};
///
/// let store = Arc::new(InMemoryTaskStore::new());
/// let sweeper = StaleTaskSweeper::new(store)
///     .with_retention(chrono::Duration::days(7));
/// ```
pub struct StaleTaskSweeper {
    store: Arc<dyn TaskStore>,
    retention: chrono::Duration,
}

impl StaleTaskSweeper {
    /// Creates a sweeper with the default retention window.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            retention: chrono::Duration::days(DEFAULT_RETENTION_DAYS),
        }
    }

    /// Overrides the retention window.
    #[must_use]
    pub fn with_retention(mut self, retention: chrono::Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Deletes every pending task created before the retention deadline.
    /// Returns the count deleted.
    pub async fn run_once(&self) -> Result<usize, TaskError> {
        let deadline = Utc::now() - self.retention;
        let stale: Vec<String> = self
            .store
            .find_by_status(TaskStatus::Pending)
            .await?
            .into_iter()
            .filter(|task| task.created_at < deadline)
            .map(|task| task.id)
            .collect();

        if stale.is_empty() {
            tracing::debug!("sweep found no stale pending tasks");
            return Ok(0);
        }

        tracing::info!(count = stale.len(), "deleting stale pending tasks");
        self.store.delete_all(&stale).await
    }

    /// Runs the sweep at `interval` (typically
    /// [`DEFAULT_SWEEP_INTERVAL`]) on the ambient runtime until the
    /// returned handle is dropped or aborted. A sweep failure is logged
    /// and the loop continues.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(err) = self.run_once().await {
                    tracing::warn!(error = %err, "stale-task sweep failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskRecord;
    use crate::store::InMemoryTaskStore;
    use crate::types::draft::TaskDraft;
    use crate::types::task::TaskType;

    fn pending_task(name: &str) -> TaskRecord {
        TaskRecord::new(
            TaskDraft::new(name, TaskType::Counter)
                .with_parameter("x", "1")
                .with_parameter("y", "3"),
        )
    }

    #[tokio::test]
    async fn deletes_only_stale_pending_tasks() {
        let store = Arc::new(InMemoryTaskStore::new());

        let mut stale_pending = pending_task("stale");
        stale_pending.created_at = Utc::now() - chrono::Duration::days(30);
        store.save(stale_pending.clone()).await.unwrap();

        let fresh_pending = store.save(pending_task("fresh")).await.unwrap();

        let mut old_completed = pending_task("old but completed");
        old_completed.created_at = Utc::now() - chrono::Duration::days(30);
        old_completed.status = TaskStatus::Completed;
        old_completed.progress = 100;
        store.save(old_completed.clone()).await.unwrap();

        let sweeper = StaleTaskSweeper::new(store.clone());
        assert_eq!(sweeper.run_once().await.unwrap(), 1);

        assert!(store.find_by_id(&stale_pending.id).await.unwrap().is_none());
        assert!(store.find_by_id(&fresh_pending.id).await.unwrap().is_some());
        assert!(store.find_by_id(&old_completed.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_sweep_deletes_nothing() {
        let store = Arc::new(InMemoryTaskStore::new());
        store.save(pending_task("fresh")).await.unwrap();

        let sweeper = StaleTaskSweeper::new(store.clone());
        assert_eq!(sweeper.run_once().await.unwrap(), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn custom_retention_is_applied() {
        let store = Arc::new(InMemoryTaskStore::new());
        let mut task = pending_task("two days old");
        task.created_at = Utc::now() - chrono::Duration::days(2);
        store.save(task).await.unwrap();

        let sweeper = StaleTaskSweeper::new(store.clone())
            .with_retention(chrono::Duration::days(1));
        assert_eq!(sweeper.run_once().await.unwrap(), 1);
        assert!(store.is_empty());
    }
}
