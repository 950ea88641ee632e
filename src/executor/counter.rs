//! Counter executor -- simulated long-running work with cooperative
//! cancellation.
//!
//! A counter task walks `current` from `x` to `y` inclusive, one step per
//! tick, persisting progress after every step. Each run registers a fresh
//! [`CancelFlag`] keyed by task id in a table owned by the executor; the
//! worker polls it once per tick, so cancellation latency is bounded by
//! the tick interval. Flag entries live for exactly one execution attempt
//! and are evicted when the run reaches a terminal transition.
//!
//! Worker failures are recorded as the task's `Failed` status and never
//! propagate: the `execute` call that started the run has already
//! returned, and the runtime must survive individual task failures
//! indefinitely.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::domain::TaskRecord;
use crate::error::TaskError;
use crate::store::TaskStore;
use crate::types::task::{TaskStatus, TaskType};

use super::TaskExecutor;

/// Default pause between counter steps. One second is a deliberate
/// simulation of long-running work; tests shrink it via
/// [`CounterExecutor::with_tick`].
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Cancellation signal for one in-flight run.
///
/// Cloned into the worker, which polls it once per tick. Requesting
/// cancellation does not stop the worker immediately -- it guarantees the
/// request is observed within one tick.
///
/// # Examples
///
/// ```
/// use taskforge::CancelFlag;
///
/// let flag = CancelFlag::default();
/// assert!(!flag.is_requested());
/// flag.request();
/// assert!(flag.is_requested());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    requested: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Marks this run as cancellation-requested.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Executor for [`TaskType::Counter`] tasks.
///
/// Owns the per-run cancellation table and the handles of spawned
/// workers. [`await_run`](CounterExecutor::await_run) lets embedders and
/// tests wait for a specific run deterministically instead of polling
/// the store.
pub struct CounterExecutor {
    store: Arc<dyn TaskStore>,
    tick: Duration,
    cancel_flags: Arc<DashMap<String, CancelFlag>>,
    runs: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl CounterExecutor {
    /// Creates an executor writing through `store` with the default tick.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            tick: DEFAULT_TICK,
            cancel_flags: Arc::new(DashMap::new()),
            runs: Mutex::new(HashMap::new()),
        }
    }

    /// Overrides the pause between counter steps.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Number of runs currently tracked for cancellation.
    pub fn tracked_runs(&self) -> usize {
        self.cancel_flags.len()
    }

    /// Waits until the background run for `task_id` has finished.
    ///
    /// Returns immediately when no run is tracked for the id (never
    /// started by this process, or already awaited).
    pub async fn await_run(&self, task_id: &str) {
        let handle = self.runs.lock().remove(task_id);
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

#[async_trait]
impl TaskExecutor for CounterExecutor {
    fn supported_type(&self) -> TaskType {
        TaskType::Counter
    }

    async fn execute(&self, task: &TaskRecord) -> Result<(), TaskError> {
        let x = parse_param(&task.parameters, "x")?;
        let y = parse_param(&task.parameters, "y")?;
        if x >= y {
            return Err(TaskError::invalid_input("x must be less than y"));
        }

        tracing::info!(task_id = %task.id, x, y, "starting counter run");

        // Fresh signal per attempt; a retry replaces any stale entry.
        let flag = CancelFlag::default();
        self.cancel_flags.insert(task.id.clone(), flag.clone());

        let mut record = task.clone();
        record.status = TaskStatus::Running;
        record.progress = 0;
        self.store.save(record).await?;

        let store = Arc::clone(&self.store);
        let flags = Arc::clone(&self.cancel_flags);
        let tick = self.tick;
        let task_id = task.id.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = run_counter(&store, &task_id, x, y, tick, &flag).await {
                tracing::error!(task_id = %task_id, error = %err, "counter run failed");
                mark_failed(&store, &task_id).await;
            }
            // Signal entries span exactly one execution attempt.
            flags.remove(&task_id);
        });
        self.runs.lock().insert(task.id.clone(), handle);

        Ok(())
    }

    async fn cancel(&self, task: &TaskRecord) -> Result<(), TaskError> {
        match self.cancel_flags.get(&task.id) {
            Some(flag) => {
                flag.request();
                tracing::info!(task_id = %task.id, "cancellation requested for counter run");
            },
            None => {
                // Not tracked: finished already, or never started by this
                // process. The orchestrator applies the visible Canceled
                // transition independently.
                tracing::debug!(task_id = %task.id, "no counter run tracked; nothing to signal");
            },
        }
        Ok(())
    }
}

/// The background loop of one counter run.
///
/// Any error propagated from here is turned into a `Failed` status by the
/// spawn wrapper; nothing reaches the caller that started the run.
async fn run_counter(
    store: &Arc<dyn TaskStore>,
    task_id: &str,
    x: i64,
    y: i64,
    tick: Duration,
    flag: &CancelFlag,
) -> Result<(), TaskError> {
    let mut current = x;
    while current <= y {
        if flag.is_requested() {
            let mut record = reload(store, task_id).await?;
            record.status = TaskStatus::Canceled;
            store.save(record).await?;
            tracing::info!(task_id = %task_id, "counter run observed cancellation");
            return Ok(());
        }

        let progress = progress_at(x, y, current);
        let mut record = reload(store, task_id).await?;
        record.progress = progress;
        store.save(record).await?;
        tracing::debug!(task_id = %task_id, progress, "counter progress");

        tokio::time::sleep(tick).await;
        current += 1;
    }

    let mut record = reload(store, task_id).await?;
    // A cancel landing during the final sleep must win: a Canceled record
    // is never overwritten with Completed.
    if flag.is_requested() || record.status == TaskStatus::Canceled {
        tracing::info!(task_id = %task_id, "counter run canceled at completion boundary");
        return Ok(());
    }
    record.progress = 100;
    record.status = TaskStatus::Completed;
    store.save(record).await?;
    tracing::info!(task_id = %task_id, "counter run completed");
    Ok(())
}

/// Percentage of the walk completed at `current`, rounded down.
fn progress_at(x: i64, y: i64, current: i64) -> u8 {
    let span = i128::from(y) - i128::from(x);
    let done = i128::from(current) - i128::from(x);
    (done * 100 / span) as u8
}

async fn reload(store: &Arc<dyn TaskStore>, task_id: &str) -> Result<TaskRecord, TaskError> {
    store
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| TaskError::not_found(task_id))
}

async fn mark_failed(store: &Arc<dyn TaskStore>, task_id: &str) {
    match reload(store, task_id).await {
        Ok(mut record) => {
            record.status = TaskStatus::Failed;
            if let Err(err) = store.save(record).await {
                tracing::warn!(task_id = %task_id, error = %err, "could not persist failed status");
            }
        },
        Err(err) => {
            tracing::warn!(task_id = %task_id, error = %err, "could not reload task to mark failed");
        },
    }
}

fn parse_param(
    parameters: &HashMap<String, String>,
    key: &str,
) -> Result<i64, TaskError> {
    let raw = parameters
        .get(key)
        .ok_or_else(|| TaskError::invalid_input(format!("missing required parameter {key}")))?;
    raw.parse()
        .map_err(|_| TaskError::invalid_input(format!("parameter {key} must be an integer")))
}
