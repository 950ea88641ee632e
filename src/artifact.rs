//! Result artifact sink -- durable storage for executor-produced files.
//!
//! Executors that produce a retrievable artifact hand its bytes to an
//! [`ArtifactSink`], which copies them to a durable location and returns
//! an opaque location token. The token is recorded on the task record
//! (hidden field) and later resolved back to bytes for result retrieval.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::TaskRecord;
use crate::error::TaskError;

/// Copies result bytes to a durable, retrievable location.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Stores `bytes` as the result artifact of `task` and returns the
    /// opaque location token to record on the task.
    ///
    /// # Errors
    ///
    /// [`TaskError::Internal`] on I/O failure.
    async fn store(&self, task: &TaskRecord, bytes: &[u8]) -> Result<String, TaskError>;

    /// Reads back the artifact previously stored at `location`.
    ///
    /// # Errors
    ///
    /// [`TaskError::Internal`] when the artifact is missing or unreadable.
    async fn load(&self, location: &str) -> Result<Vec<u8>, TaskError>;
}

/// Filesystem-backed sink writing one file per task under a root
/// directory.
///
/// The location token is the absolute path of the written file.
///
/// # Examples
///
/// ```
/// use taskforge::FsArtifactSink;
///
/// let sink = FsArtifactSink::new("/var/lib/taskforge/artifacts");
/// assert!(sink.root().ends_with("artifacts"));
/// ```
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    root: PathBuf,
}

impl FsArtifactSink {
    /// Creates a sink rooted at `root`. The directory is created on the
    /// first store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory artifacts are written under.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactSink for FsArtifactSink {
    async fn store(&self, task: &TaskRecord, bytes: &[u8]) -> Result<String, TaskError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|err| {
            TaskError::internal(format!(
                "creating artifact directory {}: {err}",
                self.root.display()
            ))
        })?;

        let path = self.root.join(format!("{}.rtf", task.id));
        tokio::fs::write(&path, bytes).await.map_err(|err| {
            TaskError::internal(format!("writing artifact {}: {err}", path.display()))
        })?;

        tracing::debug!(task_id = %task.id, path = %path.display(), "artifact stored");
        Ok(path.to_string_lossy().into_owned())
    }

    async fn load(&self, location: &str) -> Result<Vec<u8>, TaskError> {
        tokio::fs::read(location)
            .await
            .map_err(|err| TaskError::internal(format!("reading artifact {location}: {err}")))
    }
}
