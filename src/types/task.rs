//! Task classification and lifecycle status types.
//!
//! [`TaskType`] is the closed set of work categories the engine can
//! dispatch; it selects which validator and executor apply to a record
//! and is immutable once a task has been created. [`TaskStatus`] carries
//! the lifecycle state machine as methods so that every component agrees
//! on which transitions exist.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of work a task performs.
///
/// The type is fixed for the lifetime of a record. Adding a new variant
/// means registering a matching validator and executor at start-up.
///
/// # Examples
///
/// ```
/// use taskforge::TaskType;
///
/// assert_eq!(TaskType::Counter.to_string(), "counter");
/// assert_eq!(TaskType::StoreFile.to_string(), "store_file");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Counts from `x` to `y`, one step per tick, reporting progress.
    Counter,
    /// Copies the bundled artifact to a retrievable storage location.
    StoreFile,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counter => write!(f, "counter"),
            Self::StoreFile => write!(f, "store_file"),
        }
    }
}

/// Task lifecycle status.
///
/// A task moves through these states according to a fixed state machine.
/// `Completed` admits no further execution; `Failed` and `Canceled` admit
/// retry via execute.
///
/// # State machine
///
/// ```text
/// Pending   -> Running, Canceled
/// Running   -> Completed, Failed, Canceled
/// Failed    -> Running          (retry)
/// Canceled  -> Running          (retry)
/// Completed -> (no transitions)
/// ```
///
/// # Examples
///
/// ```
/// use taskforge::TaskStatus;
///
/// assert!(TaskStatus::Pending.can_transition_to(&TaskStatus::Running));
/// assert!(TaskStatus::Failed.can_transition_to(&TaskStatus::Running));
/// assert!(!TaskStatus::Completed.can_transition_to(&TaskStatus::Running));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not yet executed.
    Pending,
    /// A worker is (or was, before a crash) actively processing the task.
    Running,
    /// Work finished successfully (terminal).
    Completed,
    /// Work failed; execute may be called again to retry.
    Failed,
    /// Work was canceled; execute may be called again to retry.
    Canceled,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

impl TaskStatus {
    /// Returns `true` if this status marks the end of an execution run.
    ///
    /// Terminal here means "no run is in flight", not "no further
    /// execution is possible": `Failed` and `Canceled` tasks can be
    /// retried, while `Completed` cannot.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskforge::TaskStatus;
    ///
    /// assert!(!TaskStatus::Pending.is_terminal());
    /// assert!(!TaskStatus::Running.is_terminal());
    /// assert!(TaskStatus::Completed.is_terminal());
    /// assert!(TaskStatus::Failed.is_terminal());
    /// assert!(TaskStatus::Canceled.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }

    /// Returns `true` if transitioning from this status to `next` is a
    /// defined edge of the state machine.
    ///
    /// Self-transitions are not edges. No state re-enters `Pending`, and
    /// `Completed` admits no transition at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskforge::TaskStatus;
    ///
    /// assert!(TaskStatus::Running.can_transition_to(&TaskStatus::Canceled));
    /// assert!(TaskStatus::Canceled.can_transition_to(&TaskStatus::Running));
    /// assert!(!TaskStatus::Running.can_transition_to(&TaskStatus::Pending));
    /// assert!(!TaskStatus::Running.can_transition_to(&TaskStatus::Running));
    /// ```
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match self {
            Self::Pending => matches!(next, Self::Running | Self::Canceled),
            Self::Running => matches!(next, Self::Completed | Self::Failed | Self::Canceled),
            Self::Failed | Self::Canceled => matches!(next, Self::Running),
            Self::Completed => false,
        }
    }
}
