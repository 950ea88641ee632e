//! Task record -- the persisted representation of a unit of work.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::draft::TaskDraft;
use crate::types::task::{TaskStatus, TaskType};

/// The single persisted entity of the engine.
///
/// A record is created through [`TaskRecord::new`], which assigns a fresh
/// UUID id, `Pending` status, zero progress, and the creation timestamp.
/// Afterwards the engine mutates `name`/`parameters` (update while
/// `Pending`), `status`/`progress` (execution and cancellation, possibly
/// from a concurrently running worker), and `result_location` (executors
/// that produce an artifact).
///
/// `result_location` is skipped on serialization: the boundary layer never
/// exposes it to external callers.
///
/// # Examples
///
/// ```
/// use taskforge::{TaskDraft, TaskRecord, TaskStatus, TaskType};
///
/// let record = TaskRecord::new(TaskDraft::new("export", TaskType::StoreFile));
/// assert_eq!(record.status, TaskStatus::Pending);
/// assert_eq!(record.progress, 0);
/// assert!(!record.id.is_empty());
/// assert!(record.result_location.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Opaque unique id, assigned at creation and never reused.
    pub id: String,

    /// Free-text task name.
    pub name: String,

    /// Work category, immutable after creation.
    pub task_type: TaskType,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// Type-specific parameters.
    #[serde(default)]
    pub parameters: HashMap<String, String>,

    /// Progress in percent, 0-100. Reset to 0 at the start of each
    /// execution attempt and monotonically non-decreasing within one run.
    pub progress: u8,

    /// Storage location of the produced artifact, when the task's executor
    /// records one. Hidden from external callers.
    #[serde(skip_serializing, default)]
    pub result_location: Option<String>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Builds a fresh record from a validated draft.
    ///
    /// Anything the engine owns is assigned here: a `UUIDv4` id, `Pending`
    /// status, zero progress, and the current UTC timestamp.
    pub fn new(draft: TaskDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            task_type: draft.task_type,
            status: TaskStatus::Pending,
            parameters: draft.parameters,
            progress: 0,
            result_location: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_draft() -> TaskDraft {
        TaskDraft::new("count", TaskType::Counter)
            .with_parameter("x", "1")
            .with_parameter("y", "3")
    }

    #[test]
    fn new_record_has_uuid_id() {
        let record = TaskRecord::new(counter_draft());
        // UUID v4 format: 8-4-4-4-12 hex chars
        assert_eq!(record.id.len(), 36);
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn new_record_starts_pending_with_zero_progress() {
        let record = TaskRecord::new(counter_draft());
        assert_eq!(record.status, TaskStatus::Pending);
        assert_eq!(record.progress, 0);
        assert!(record.result_location.is_none());
    }

    #[test]
    fn new_record_keeps_draft_fields() {
        let record = TaskRecord::new(counter_draft());
        assert_eq!(record.name, "count");
        assert_eq!(record.task_type, TaskType::Counter);
        assert_eq!(record.parameters.get("x").map(String::as_str), Some("1"));
        assert_eq!(record.parameters.get("y").map(String::as_str), Some("3"));
    }

    #[test]
    fn ids_are_never_reused() {
        let a = TaskRecord::new(counter_draft());
        let b = TaskRecord::new(counter_draft());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn result_location_is_not_serialized() {
        let mut record = TaskRecord::new(TaskDraft::new("export", TaskType::StoreFile));
        record.result_location = Some("/var/artifacts/x.rtf".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("resultLocation").is_none());
        assert!(json.get("result_location").is_none());
        assert_eq!(json["taskType"], "store_file");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn record_deserializes_without_result_location() {
        let json = r#"{
            "id": "abc-1",
            "name": "count",
            "taskType": "counter",
            "status": "running",
            "parameters": {"x": "1", "y": "3"},
            "progress": 50,
            "createdAt": "2026-08-04T10:30:00Z"
        }"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "abc-1");
        assert_eq!(record.status, TaskStatus::Running);
        assert_eq!(record.progress, 50);
        assert!(record.result_location.is_none());
    }
}
