//! Error types for task engine operations.
//!
//! [`TaskError`] enumerates the distinct error kinds the orchestrator can
//! surface. A boundary layer (HTTP, CLI) translates each kind to its own
//! status codes; [`TaskError::is_fatal`] separates the kinds that indicate
//! a caller logic error or an internal failure from the ordinary
//! request-level ones.

use thiserror::Error;

/// Errors surfaced by orchestrator operations.
///
/// # Examples
///
/// ```
/// use taskforge::TaskError;
///
/// let err = TaskError::not_found("missing-task");
/// assert!(err.to_string().contains("missing-task"));
/// assert!(!err.is_fatal());
///
/// let err = TaskError::internal("artifact write failed");
/// assert!(err.is_fatal());
/// ```
#[derive(Error, Debug)]
pub enum TaskError {
    /// No record exists for the given task id.
    #[error("task not found: {task_id}")]
    NotFound {
        /// The id that was looked up.
        task_id: String,
    },

    /// Caller-supplied input was rejected: parameter validation failed,
    /// a result was requested for a type that produces none, or a task
    /// already in an acceptable terminal state was asked to cancel again.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// The request contradicts the record's current shape: an attempt to
    /// change an immutable field, or to edit a task that is no longer
    /// `Pending`.
    #[error("conflict: {reason}")]
    Conflict {
        /// What the request conflicted with.
        reason: String,
    },

    /// The operation is not legal for the task's current status, e.g.
    /// execute on a `Running` or `Completed` task, or cancel on a `Failed`
    /// one. Treated as a caller logic error, not retried.
    #[error("illegal state for task {task_id}: {reason}")]
    IllegalState {
        /// The task the operation targeted.
        task_id: String,
        /// Which precondition was violated.
        reason: String,
    },

    /// An internal failure: artifact I/O, a missing result artifact, or a
    /// registry missing an implementation for a permitted task type.
    #[error("internal error: {reason}")]
    Internal {
        /// Description of the failure.
        reason: String,
    },
}

impl TaskError {
    /// A [`TaskError::NotFound`] for the given id.
    pub fn not_found(task_id: impl Into<String>) -> Self {
        Self::NotFound {
            task_id: task_id.into(),
        }
    }

    /// A [`TaskError::InvalidInput`] with the given reason.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// A [`TaskError::Conflict`] with the given reason.
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    /// A [`TaskError::IllegalState`] for the given task.
    pub fn illegal_state(task_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IllegalState {
            task_id: task_id.into(),
            reason: reason.into(),
        }
    }

    /// A [`TaskError::Internal`] with the given reason.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Returns `true` for the fatal-class kinds.
    ///
    /// `IllegalState` and `Internal` are not ordinary request failures:
    /// the former is a caller logic error, the latter a process-side
    /// fault. Boundary layers surface them as such instead of retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IllegalState { .. } | Self::Internal { .. })
    }
}
