//! Caller-supplied task payloads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::task::TaskType;

/// The payload a caller submits to create or update a task.
///
/// A draft deliberately carries no id, status, or progress: those fields
/// are owned by the engine, so a caller cannot supply them even by
/// accident. On update, `task_type` must match the existing record.
///
/// # Examples
///
/// ```
/// use taskforge::{TaskDraft, TaskType};
///
/// let draft = TaskDraft::new("count to ten", TaskType::Counter)
///     .with_parameter("x", "1")
///     .with_parameter("y", "10");
/// assert_eq!(draft.parameters.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Free-text task name.
    pub name: String,

    /// Work category; selects the validator and executor.
    pub task_type: TaskType,

    /// Type-specific parameters, validated before the draft is accepted.
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl TaskDraft {
    /// Creates a draft with an empty parameter map.
    pub fn new(name: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            name: name.into(),
            task_type,
            parameters: HashMap::new(),
        }
    }

    /// Adds one parameter, builder style.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}
