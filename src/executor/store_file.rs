//! File storage executor -- copies the bundled artifact to a retrievable
//! location.

use std::sync::Arc;

use async_trait::async_trait;

use crate::artifact::ArtifactSink;
use crate::domain::TaskRecord;
use crate::error::TaskError;
use crate::store::TaskStore;
use crate::types::task::{TaskStatus, TaskType};

use super::TaskExecutor;

/// The one fixed artifact every file storage task produces a copy of.
const BUNDLED_ARTIFACT: &[u8] = include_bytes!("../../assets/export-sample.rtf");

/// Executor for [`TaskType::StoreFile`] tasks.
///
/// Unlike the counter executor, the copy is quick enough that the work
/// completes synchronously within `execute`; an I/O failure is therefore
/// visible to the caller as [`TaskError::Internal`], after the `Failed`
/// status has been persisted.
pub struct FileStorageExecutor {
    store: Arc<dyn TaskStore>,
    sink: Arc<dyn ArtifactSink>,
}

impl FileStorageExecutor {
    /// Creates an executor writing records through `store` and artifact
    /// bytes through `sink`.
    pub fn new(store: Arc<dyn TaskStore>, sink: Arc<dyn ArtifactSink>) -> Self {
        Self { store, sink }
    }
}

#[async_trait]
impl TaskExecutor for FileStorageExecutor {
    fn supported_type(&self) -> TaskType {
        TaskType::StoreFile
    }

    async fn execute(&self, task: &TaskRecord) -> Result<(), TaskError> {
        tracing::info!(task_id = %task.id, "storing bundled artifact");

        let mut record = task.clone();
        record.status = TaskStatus::Running;
        record.progress = 0;
        let mut record = self.store.save(record).await?;

        match self.sink.store(&record, BUNDLED_ARTIFACT).await {
            Ok(location) => {
                record.result_location = Some(location);
                record.progress = 100;
                record.status = TaskStatus::Completed;
                self.store.save(record).await?;
                tracing::info!(task_id = %task.id, "artifact stored and task completed");
                Ok(())
            },
            Err(err) => {
                tracing::error!(task_id = %task.id, error = %err, "artifact store failed");
                record.status = TaskStatus::Failed;
                self.store.save(record).await?;
                Err(err)
            },
        }
    }

    async fn cancel(&self, task: &TaskRecord) -> Result<(), TaskError> {
        if task.status == TaskStatus::Completed {
            // A completed artifact cannot be un-produced.
            tracing::debug!(task_id = %task.id, "ignoring cancel of completed file storage task");
            return Ok(());
        }
        let mut record = task.clone();
        record.status = TaskStatus::Canceled;
        self.store.save(record).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::FsArtifactSink;
    use crate::store::InMemoryTaskStore;
    use crate::types::draft::TaskDraft;

    fn setup() -> (Arc<InMemoryTaskStore>, tempfile::TempDir, FileStorageExecutor) {
        let store = Arc::new(InMemoryTaskStore::new());
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(FsArtifactSink::new(dir.path().join("artifacts")));
        let executor = FileStorageExecutor::new(store.clone(), sink);
        (store, dir, executor)
    }

    #[tokio::test]
    async fn execute_completes_and_records_location() {
        let (store, _dir, executor) = setup();
        let task = store
            .save(TaskRecord::new(TaskDraft::new("export", TaskType::StoreFile)))
            .await
            .unwrap();

        executor.execute(&task).await.unwrap();

        let stored = store.find_by_id(&task.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
        assert_eq!(stored.progress, 100);
        let location = stored.result_location.expect("location recorded");
        assert!(location.contains(&task.id));
        assert_eq!(std::fs::read(&location).unwrap(), BUNDLED_ARTIFACT);
    }

    #[tokio::test]
    async fn cancel_before_completion_persists_canceled() {
        let (store, _dir, executor) = setup();
        let task = store
            .save(TaskRecord::new(TaskDraft::new("export", TaskType::StoreFile)))
            .await
            .unwrap();

        executor.cancel(&task).await.unwrap();

        let stored = store.find_by_id(&task.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Canceled);
    }

    #[tokio::test]
    async fn cancel_after_completion_is_noop() {
        let (store, _dir, executor) = setup();
        let task = store
            .save(TaskRecord::new(TaskDraft::new("export", TaskType::StoreFile)))
            .await
            .unwrap();
        executor.execute(&task).await.unwrap();

        let completed = store.find_by_id(&task.id).await.unwrap().unwrap();
        executor.cancel(&completed).await.unwrap();

        let stored = store.find_by_id(&task.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
    }
}
