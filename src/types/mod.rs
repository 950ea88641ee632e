//! Public task types: classification, lifecycle status, and caller payloads.

pub mod draft;
pub mod task;

pub use draft::TaskDraft;
pub use task::{TaskStatus, TaskType};
