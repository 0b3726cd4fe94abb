//! Storage trait definitions.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::entities::{Identity, NewTask, Task, TaskPatch};
use crate::errors::TaskEaseResult;

/// One live-query notification: the complete matching set, or the error
/// that ended the subscription.
pub type Snapshot = TaskEaseResult<Vec<Task>>;

/// One entry of an atomic batch update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchUpdate {
    pub task_id: String,
    pub patch: TaskPatch,
}

impl BatchUpdate {
    pub fn new(task_id: impl Into<String>, patch: TaskPatch) -> Self {
        Self {
            task_id: task_id.into(),
            patch,
        }
    }
}

/// Handle to a live, owner-scoped task query.
///
/// The store stops delivering to it as soon as the handle is dropped.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Snapshot>,
    on_release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Wrap a receiver; `on_release` runs exactly once when the handle goes away.
    pub fn new(
        rx: mpsc::UnboundedReceiver<Snapshot>,
        on_release: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            rx,
            on_release: Some(Box::new(on_release)),
        }
    }

    /// A subscription fed by the returned sender, with nothing to release.
    pub fn channel() -> (mpsc::UnboundedSender<Snapshot>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, || {}))
    }

    /// Wait for the next notification. `None` once the store has closed it.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }

    /// Take an already-delivered notification without waiting.
    pub fn try_next(&mut self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.on_release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Document store holding every user's tasks.
///
/// Every call carries the caller's identity; implementations reject
/// reads and writes of tasks owned by someone else.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Get storage type identifier
    fn storage_type(&self) -> &'static str;

    /// Open a live query over the owner's tasks, newest first.
    ///
    /// The first notification carries the current set; every later one
    /// carries the full set again after a change.
    async fn subscribe(&self, owner: &Identity) -> TaskEaseResult<Subscription>;

    /// One-shot read of the owner's tasks, newest first
    async fn list_tasks(&self, owner: &Identity) -> TaskEaseResult<Vec<Task>>;

    /// Load a single task by ID
    async fn get_task(&self, owner: &Identity, task_id: &str) -> TaskEaseResult<Option<Task>>;

    /// Create a task; the store assigns id, owner and timestamps
    async fn create_task(&self, owner: &Identity, task: NewTask) -> TaskEaseResult<Task>;

    /// Patch a task and bump its `updatedAt`
    async fn update_task(
        &self,
        owner: &Identity,
        task_id: &str,
        patch: &TaskPatch,
    ) -> TaskEaseResult<()>;

    /// Delete a task
    async fn delete_task(&self, owner: &Identity, task_id: &str) -> TaskEaseResult<()>;

    /// Apply all patches or none of them
    async fn batch_update(&self, owner: &Identity, updates: &[BatchUpdate]) -> TaskEaseResult<()>;
}
