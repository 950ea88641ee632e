//! Task orchestrator -- owns the lifecycle state machine, enforces
//! operation preconditions, and dispatches to the per-type registries.
//!
//! Every operation loads the record, checks the state machine's
//! preconditions, and either mutates state directly or delegates to the
//! type's executor. Operations complete without waiting for executor
//! completion; only the initial status write is awaited.

use std::sync::Arc;

use crate::artifact::ArtifactSink;
use crate::domain::TaskRecord;
use crate::error::TaskError;
use crate::executor::ExecutorRegistry;
use crate::store::TaskStore;
use crate::types::draft::TaskDraft;
use crate::types::task::{TaskStatus, TaskType};
use crate::validator::ValidatorRegistry;

/// The engine's front door: create, inspect, mutate, execute, cancel,
/// and recover tasks.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use taskforge::{
///     CounterExecutor, ExecutorRegistry, FileStorageExecutor, FsArtifactSink,
///     InMemoryTaskStore, TaskDraft, TaskExecutor, TaskOrchestrator, TaskType,
///     ValidatorRegistry,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), taskforge::TaskError> {
/// let store: Arc<InMemoryTaskStore> = Arc::new(InMemoryTaskStore::new());
/// let sink = Arc::new(FsArtifactSink::new("/var/lib/taskforge/artifacts"));
/// let executors = ExecutorRegistry::new([
///     Arc::new(CounterExecutor::new(store.clone())) as Arc<dyn TaskExecutor>,
///     Arc::new(FileStorageExecutor::new(store.clone(), sink.clone())),
/// ]);
/// let orchestrator =
///     TaskOrchestrator::new(store, sink, ValidatorRegistry::builtin(), executors);
///
/// orchestrator.recover().await?;
/// let task = orchestrator
///     .create(TaskDraft::new("count", TaskType::Counter)
///         .with_parameter("x", "1")
///         .with_parameter("y", "10"))
///     .await?;
/// orchestrator.execute(&task.id).await?;
/// # Ok(())
/// # }
/// ```
pub struct TaskOrchestrator {
    store: Arc<dyn TaskStore>,
    sink: Arc<dyn ArtifactSink>,
    validators: ValidatorRegistry,
    executors: ExecutorRegistry,
}

impl TaskOrchestrator {
    /// Wires the orchestrator to its collaborators. Call
    /// [`recover`](TaskOrchestrator::recover) once before accepting work.
    pub fn new(
        store: Arc<dyn TaskStore>,
        sink: Arc<dyn ArtifactSink>,
        validators: ValidatorRegistry,
        executors: ExecutorRegistry,
    ) -> Self {
        Self {
            store,
            sink,
            validators,
            executors,
        }
    }

    /// Validates and persists a new task.
    ///
    /// The draft's parameters are checked by the type's validator; on
    /// success a fresh record is stored with `Pending` status and zero
    /// progress.
    ///
    /// # Errors
    ///
    /// [`TaskError::InvalidInput`] when validation rejects the
    /// parameters; nothing is persisted in that case.
    pub async fn create(&self, draft: TaskDraft) -> Result<TaskRecord, TaskError> {
        tracing::info!(name = %draft.name, task_type = %draft.task_type, "creating task");
        self.validators
            .resolve(draft.task_type)?
            .validate(&draft.parameters)?;
        self.store.save(TaskRecord::new(draft)).await
    }

    /// Loads a task by id.
    ///
    /// # Errors
    ///
    /// [`TaskError::NotFound`] when no record exists.
    pub async fn get(&self, task_id: &str) -> Result<TaskRecord, TaskError> {
        self.store
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskError::not_found(task_id))
    }

    /// Lists every task, ordered by creation time.
    pub async fn list(&self) -> Result<Vec<TaskRecord>, TaskError> {
        self.store.find_all().await
    }

    /// Updates a pending task's name and parameters.
    ///
    /// # Errors
    ///
    /// - [`TaskError::NotFound`] when no record exists.
    /// - [`TaskError::Conflict`] when the draft changes the task type, or
    ///   the task is no longer `Pending`.
    /// - [`TaskError::InvalidInput`] when the new parameters fail the
    ///   type's validator.
    pub async fn update(&self, task_id: &str, draft: TaskDraft) -> Result<TaskRecord, TaskError> {
        tracing::info!(task_id = %task_id, "updating task");
        let mut existing = self.get(task_id).await?;

        if draft.task_type != existing.task_type {
            return Err(TaskError::conflict("task type cannot be changed once created"));
        }
        if existing.status != TaskStatus::Pending {
            return Err(TaskError::conflict("only pending tasks can be updated"));
        }
        self.validators
            .resolve(draft.task_type)?
            .validate(&draft.parameters)?;

        existing.name = draft.name;
        existing.parameters = draft.parameters;
        self.store.save(existing).await
    }

    /// Removes a task. Deleting an absent id is a caller concern, not an
    /// error here.
    pub async fn delete(&self, task_id: &str) -> Result<(), TaskError> {
        tracing::info!(task_id = %task_id, "deleting task");
        self.store.delete_by_id(task_id).await?;
        Ok(())
    }

    /// Starts executing a task.
    ///
    /// Dispatches to the type's executor, which owns the transition to
    /// `Running` and all subsequent progress/terminal writes. Returns
    /// once the executor has accepted the work; it does not wait for
    /// completion.
    ///
    /// # Errors
    ///
    /// - [`TaskError::NotFound`] when no record exists.
    /// - [`TaskError::IllegalState`] when the task is already `Running`
    ///   or `Completed`.
    pub async fn execute(&self, task_id: &str) -> Result<(), TaskError> {
        let task = self.get(task_id).await?;

        match task.status {
            TaskStatus::Running => {
                tracing::warn!(task_id = %task_id, "refusing execute: already running");
                return Err(TaskError::illegal_state(task_id, "task is already running"));
            },
            TaskStatus::Completed => {
                tracing::warn!(task_id = %task_id, "refusing execute: already completed");
                return Err(TaskError::illegal_state(task_id, "task is already completed"));
            },
            TaskStatus::Pending | TaskStatus::Failed | TaskStatus::Canceled => {},
        }

        let executor = self.executors.resolve(task.task_type)?;
        tracing::info!(task_id = %task_id, task_type = %task.task_type, "dispatching task to executor");
        executor.execute(&task).await
    }

    /// Cancels a task.
    ///
    /// Forwards the request to the type's executor, then marks the
    /// record `Canceled` and persists it. For a running task the worker
    /// may still be mid-iteration when this returns; it observes the
    /// request within one tick and never overwrites the Canceled status
    /// with `Completed`.
    ///
    /// # Errors
    ///
    /// - [`TaskError::NotFound`] when no record exists.
    /// - [`TaskError::InvalidInput`] when the task is already `Completed`
    ///   or `Canceled`.
    /// - [`TaskError::IllegalState`] when the task is `Failed`.
    pub async fn cancel(&self, task_id: &str) -> Result<TaskRecord, TaskError> {
        tracing::info!(task_id = %task_id, "canceling task");
        let task = self.get(task_id).await?;

        match task.status {
            TaskStatus::Completed => {
                return Err(TaskError::invalid_input("already completed task cannot be canceled"));
            },
            TaskStatus::Canceled => {
                return Err(TaskError::invalid_input("already canceled task cannot be canceled"));
            },
            TaskStatus::Failed => {
                return Err(TaskError::illegal_state(task_id, "failed task cannot be canceled"));
            },
            TaskStatus::Pending | TaskStatus::Running => {},
        }

        self.executors.resolve(task.task_type)?.cancel(&task).await?;

        // Reload: the executor may have persisted in the meantime.
        let mut record = self.get(task_id).await?;
        record.status = TaskStatus::Canceled;
        let record = self.store.save(record).await?;
        tracing::info!(task_id = %task_id, "task canceled");
        Ok(record)
    }

    /// Current progress of a task, in percent.
    ///
    /// # Errors
    ///
    /// [`TaskError::NotFound`] when no record exists.
    pub async fn progress(&self, task_id: &str) -> Result<u8, TaskError> {
        Ok(self.get(task_id).await?.progress)
    }

    /// Returns the bytes of a task's result artifact.
    ///
    /// # Errors
    ///
    /// - [`TaskError::NotFound`] when no record exists.
    /// - [`TaskError::InvalidInput`] when the task's type produces no
    ///   retrievable result.
    /// - [`TaskError::Internal`] when no artifact was recorded or it can
    ///   no longer be read.
    pub async fn result(&self, task_id: &str) -> Result<Vec<u8>, TaskError> {
        let task = self.get(task_id).await?;

        if task.task_type != TaskType::StoreFile {
            return Err(TaskError::invalid_input(
                "task type has no retrievable result",
            ));
        }
        let location = task.result_location.as_deref().ok_or_else(|| {
            tracing::error!(task_id = %task_id, "result requested but no artifact recorded");
            TaskError::internal(format!("no result stored for task {task_id}"))
        })?;

        self.sink.load(location).await
    }

    /// Start-up sweep: forces every record persisted as `Running` to
    /// `Failed`.
    ///
    /// A persisted `Running` status can only be produced while a worker
    /// is alive in the same process; observing it at start-up proves the
    /// owning process died and no worker will resume or cancel the task.
    /// Its true outcome is unknowable, so the only consistent terminal
    /// status is `Failed`. Returns the number of records repaired.
    pub async fn recover(&self) -> Result<usize, TaskError> {
        let running = self.store.find_by_status(TaskStatus::Running).await?;
        if running.is_empty() {
            return Ok(0);
        }

        tracing::warn!(
            count = running.len(),
            "failing tasks left running by a previous process"
        );
        let mut repaired = 0;
        for mut record in running {
            record.status = TaskStatus::Failed;
            self.store.save(record).await?;
            repaired += 1;
        }
        Ok(repaired)
    }
}
