//! Per-type execution capabilities and the executor registry.
//!
//! A [`TaskExecutor`] runs a task type's actual work and can be asked to
//! cancel it. Executors own the Pending/Failed/Canceled -> Running
//! transition and every subsequent progress/terminal write; the
//! orchestrator only enforces preconditions and dispatches.
//!
//! The [`ExecutorRegistry`] follows the same discipline as the validator
//! registry: built once at start-up from the full set of implementations,
//! with resolution failure being a fatal misconfiguration.

pub mod counter;
pub mod store_file;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::TaskRecord;
use crate::error::TaskError;
use crate::types::task::TaskType;

pub use counter::{CancelFlag, CounterExecutor};
pub use store_file::FileStorageExecutor;

/// Runs and cancels one task type's work.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// The task type this executor runs.
    fn supported_type(&self) -> TaskType;

    /// Starts executing `task`.
    ///
    /// The executor transitions the record to `Running` with zero
    /// progress and persists before any work happens. Long-running
    /// executors return once that write completes and continue in the
    /// background, self-reporting through the store; short synchronous
    /// executors may finish the work within this call.
    ///
    /// # Errors
    ///
    /// [`TaskError::InvalidInput`] for malformed parameters,
    /// [`TaskError::Internal`] for failures the caller must observe
    /// directly. Background failures are recorded as the task's `Failed`
    /// status instead and never surface here.
    async fn execute(&self, task: &TaskRecord) -> Result<(), TaskError>;

    /// Requests cancellation of `task`.
    ///
    /// Cancellation is advisory: a running worker observes the request
    /// within one tick. Cancelling a task this executor is not currently
    /// tracking is a no-op.
    async fn cancel(&self, task: &TaskRecord) -> Result<(), TaskError>;
}

impl std::fmt::Debug for dyn TaskExecutor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskExecutor")
            .field("supported_type", &self.supported_type())
            .finish()
    }
}

/// Fixed mapping from task type to its executor, built once at start-up.
pub struct ExecutorRegistry {
    executors: HashMap<TaskType, Arc<dyn TaskExecutor>>,
}

impl ExecutorRegistry {
    /// Builds the registry from the full set of executor implementations.
    /// A later executor for the same type replaces an earlier one.
    pub fn new<I>(executors: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn TaskExecutor>>,
    {
        Self {
            executors: executors
                .into_iter()
                .map(|executor| (executor.supported_type(), executor))
                .collect(),
        }
    }

    /// Resolves the executor for `task_type`.
    ///
    /// # Errors
    ///
    /// [`TaskError::Internal`] if no executor is registered for a type
    /// the enum permits -- a start-up misconfiguration, not a client
    /// error.
    pub fn resolve(&self, task_type: TaskType) -> Result<&dyn TaskExecutor, TaskError> {
        match self.executors.get(&task_type) {
            Some(executor) => Ok(executor.as_ref()),
            None => {
                tracing::error!(task_type = %task_type, "no executor registered");
                Err(TaskError::internal(format!(
                    "no executor registered for task type {task_type}"
                )))
            },
        }
    }
}
