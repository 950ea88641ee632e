//! Typed task lifecycle and execution-dispatch engine.
//!
//! Clients submit typed units of work ("tasks"); the engine validates
//! them per type, runs them asynchronously with progress and cooperative
//! cancellation, and recovers consistently after a process restart.
//!
//! # Overview
//!
//! A task is a persisted record with a type, a lifecycle status, a
//! string-keyed parameter map, and a progress percentage. Status moves
//! along a fixed state machine:
//!
//! ```text
//! Pending   -> Running, Canceled
//! Running   -> Completed, Failed, Canceled
//! Failed    -> Running          (retry)
//! Canceled  -> Running          (retry)
//! Completed -> (no transitions)
//! ```
//!
//! The [`TaskOrchestrator`] enforces operation preconditions and
//! dispatches to per-type capabilities: a [`TaskValidator`] checks
//! parameters before anything is persisted, and a [`TaskExecutor`] runs
//! the work, self-reporting progress and terminal status through the
//! [`TaskStore`]. Long-running executors poll a per-run [`CancelFlag`],
//! so cancellation latency is bounded by one tick. At start-up,
//! [`TaskOrchestrator::recover`] forces any record left `Running` by a
//! crashed process to `Failed`.
//!
//! The durable store, the result-artifact sink, and the stale-pending
//! sweep are collaborators behind narrow traits; in-memory and
//! filesystem reference implementations are included.
//!
//! # Module organization
//!
//! - [`types`] -- task classification, lifecycle status, caller payloads
//! - [`domain`] -- the persisted [`TaskRecord`]
//! - [`error`] -- [`TaskError`] kinds for the boundary layer
//! - [`store`] -- the [`TaskStore`] contract and in-memory implementation
//! - [`validator`] -- per-type parameter validation and its registry
//! - [`executor`] -- per-type execution capabilities and their registry
//! - [`artifact`] -- result-artifact sink
//! - [`orchestrator`] -- the [`TaskOrchestrator`]
//! - [`cleanup`] -- the stale-pending sweeper

pub mod artifact;
pub mod cleanup;
pub mod domain;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod store;
pub mod types;
pub mod validator;

// Re-exports for ergonomic access
pub use artifact::{ArtifactSink, FsArtifactSink};
pub use cleanup::StaleTaskSweeper;
pub use domain::TaskRecord;
pub use error::TaskError;
pub use executor::{
    CancelFlag, CounterExecutor, ExecutorRegistry, FileStorageExecutor, TaskExecutor,
};
pub use orchestrator::TaskOrchestrator;
pub use store::{InMemoryTaskStore, TaskStore};
pub use types::{TaskDraft, TaskStatus, TaskType};
pub use validator::{CounterValidator, StoreFileValidator, TaskValidator, ValidatorRegistry};
