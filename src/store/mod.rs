//! Task store contract and the in-memory reference implementation.
//!
//! The store is an external collaborator consumed through the narrow
//! [`TaskStore`] trait: durable keyed storage for [`TaskRecord`]s with
//! create/read/update/delete/list/find-by-status. All lifecycle
//! intelligence (state machine, preconditions, dispatch) lives in the
//! orchestrator and executors, never here.
//!
//! [`InMemoryTaskStore`](memory::InMemoryTaskStore) is the bundled
//! reference implementation, suitable for tests and single-process
//! embedders.

pub mod memory;

use async_trait::async_trait;

use crate::domain::TaskRecord;
use crate::error::TaskError;
use crate::types::task::TaskStatus;

pub use memory::InMemoryTaskStore;

/// Durable keyed storage for task records.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; the orchestrator and background
/// workers call into the store concurrently.
///
/// # Consistency
///
/// [`save`](TaskStore::save) replaces the whole record. Per-task updates
/// are read-modify-write with last-writer-wins: concurrent cancellation
/// and in-flight progress writes on the same task may interleave, but
/// every write must leave the stored record individually consistent.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts or replaces the record keyed by `record.id` and returns
    /// the stored value.
    ///
    /// # Errors
    ///
    /// [`TaskError::Internal`] on backend failures.
    async fn save(&self, record: TaskRecord) -> Result<TaskRecord, TaskError>;

    /// Looks up a record by id. Absence is `Ok(None)`, not an error, at
    /// this layer; callers decide whether a missing record is
    /// [`TaskError::NotFound`].
    async fn find_by_id(&self, task_id: &str) -> Result<Option<TaskRecord>, TaskError>;

    /// Returns all records, ordered by creation time (oldest first).
    async fn find_all(&self) -> Result<Vec<TaskRecord>, TaskError>;

    /// Returns all records whose status equals `status`, ordered by
    /// creation time (oldest first).
    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<TaskRecord>, TaskError>;

    /// Deletes the record with the given id. Returns `true` if a record
    /// existed and was removed (idempotent delete).
    async fn delete_by_id(&self, task_id: &str) -> Result<bool, TaskError>;

    /// Deletes every record whose id appears in `task_ids`. Returns the
    /// count actually removed.
    async fn delete_all(&self, task_ids: &[String]) -> Result<usize, TaskError>;
}
