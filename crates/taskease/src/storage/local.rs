//! In-process task store with optional JSON-file persistence.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::traits::{BatchUpdate, Snapshot, Subscription, TaskStore};
use crate::entities::{Identity, NewTask, Task, TaskPatch};
use crate::errors::{TaskEaseError, TaskEaseResult};

/// A task plus its insertion sequence, used to break `createdAt` ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTask {
    seq: u64,
    task: Task,
}

/// Everything that gets persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Documents {
    #[serde(default)]
    tasks: BTreeMap<String, StoredTask>,
    #[serde(default)]
    next_seq: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_timestamp: Option<DateTime<Utc>>,
}

impl Documents {
    /// Server clock: never goes backwards.
    fn server_time(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    /// The owner's tasks, `createdAt` descending.
    fn snapshot(&self, owner_uid: &str) -> Vec<Task> {
        let mut owned: Vec<&StoredTask> = self
            .tasks
            .values()
            .filter(|s| s.task.owner_id == owner_uid)
            .collect();
        owned.sort_by(|a, b| {
            b.task
                .created_at
                .cmp(&a.task.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        owned.into_iter().map(|s| s.task.clone()).collect()
    }

    fn owned_mut(&mut self, owner: &Identity, task_id: &str) -> TaskEaseResult<&mut Task> {
        let stored = self
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| TaskEaseError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;
        if stored.task.owner_id != owner.uid {
            return Err(TaskEaseError::PermissionDenied {
                task_id: task_id.to_string(),
            });
        }
        Ok(&mut stored.task)
    }
}

struct Subscriber {
    owner_uid: String,
    tx: mpsc::UnboundedSender<Snapshot>,
}

#[derive(Default)]
struct StoreState {
    docs: Documents,
    subscribers: HashMap<u64, Subscriber>,
    next_subscriber: u64,
}

impl StoreState {
    /// Push a fresh snapshot to every live subscriber of `owner_uid`.
    fn notify(&mut self, owner_uid: &str) {
        let snapshot = self.docs.snapshot(owner_uid);
        self.subscribers.retain(|id, sub| {
            if sub.owner_uid != owner_uid {
                return true;
            }
            let delivered = sub.tx.send(Ok(snapshot.clone())).is_ok();
            if !delivered {
                tracing::debug!(subscriber = id, "Dropping closed subscriber");
            }
            delivered
        });
    }
}

fn lock(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Task store kept in memory, optionally mirrored to `.taskease/tasks.json`.
///
/// Writes are serialized; each one is applied to a copy of the documents,
/// persisted, and only then made visible, so a failed write changes nothing.
pub struct LocalStore {
    state: Arc<Mutex<StoreState>>,
    write_lock: tokio::sync::Mutex<()>,
    tasks_file: Option<PathBuf>,
}

impl LocalStore {
    /// Create a purely in-memory store
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            write_lock: tokio::sync::Mutex::new(()),
            tasks_file: None,
        }
    }

    /// Open a file-backed store under `project_path/.taskease/`
    pub async fn open(project_path: impl AsRef<Path>) -> TaskEaseResult<Self> {
        let tasks_file = project_path.as_ref().join(".taskease").join("tasks.json");
        let docs = match fs::read_to_string(&tasks_file).await {
            Ok(content) => serde_json::from_str::<Documents>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Documents::default(),
            Err(e) => {
                return Err(TaskEaseError::FileReadError {
                    path: tasks_file.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };
        tracing::debug!(path = %tasks_file.display(), tasks = docs.tasks.len(), "Opened task store");

        Ok(Self {
            state: Arc::new(Mutex::new(StoreState {
                docs,
                ..StoreState::default()
            })),
            write_lock: tokio::sync::Mutex::new(()),
            tasks_file: Some(tasks_file),
        })
    }

    /// Path of the backing file, if any
    pub fn tasks_file(&self) -> Option<&Path> {
        self.tasks_file.as_deref()
    }

    /// Number of open live queries
    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }

    async fn persist(&self, docs: &Documents) -> TaskEaseResult<()> {
        let Some(path) = &self.tasks_file else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(docs)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .map_err(|e| TaskEaseError::FileWriteError {
                path: tmp.display().to_string(),
                reason: e.to_string(),
            })?;
        fs::rename(&tmp, path)
            .await
            .map_err(|e| TaskEaseError::FileWriteError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Run one write against a copy of the documents, persist, then publish.
    async fn commit<R>(
        &self,
        owner: &Identity,
        mutate: impl FnOnce(&mut Documents) -> TaskEaseResult<R>,
    ) -> TaskEaseResult<R> {
        let _guard = self.write_lock.lock().await;

        let mut docs = lock(&self.state).docs.clone();
        let result = mutate(&mut docs)?;
        self.persist(&docs).await?;

        let mut state = lock(&self.state);
        state.docs = docs;
        state.notify(&owner.uid);
        Ok(result)
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[async_trait]
impl TaskStore for LocalStore {
    fn storage_type(&self) -> &'static str {
        if self.tasks_file.is_some() {
            "file"
        } else {
            "memory"
        }
    }

    async fn subscribe(&self, owner: &Identity) -> TaskEaseResult<Subscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut state = lock(&self.state);
            let id = state.next_subscriber;
            state.next_subscriber += 1;
            // Initial snapshot goes out before any later change can.
            let _ = tx.send(Ok(state.docs.snapshot(&owner.uid)));
            state.subscribers.insert(
                id,
                Subscriber {
                    owner_uid: owner.uid.clone(),
                    tx,
                },
            );
            id
        };
        tracing::debug!(owner = %owner.uid, subscriber = id, "Live query opened");

        let state: Weak<Mutex<StoreState>> = Arc::downgrade(&self.state);
        Ok(Subscription::new(rx, move || {
            if let Some(state) = state.upgrade() {
                lock(&state).subscribers.remove(&id);
                tracing::debug!(subscriber = id, "Live query released");
            }
        }))
    }

    async fn list_tasks(&self, owner: &Identity) -> TaskEaseResult<Vec<Task>> {
        Ok(lock(&self.state).docs.snapshot(&owner.uid))
    }

    async fn get_task(&self, owner: &Identity, task_id: &str) -> TaskEaseResult<Option<Task>> {
        let state = lock(&self.state);
        match state.docs.tasks.get(task_id) {
            Some(stored) if stored.task.owner_id != owner.uid => {
                Err(TaskEaseError::PermissionDenied {
                    task_id: task_id.to_string(),
                })
            }
            Some(stored) => Ok(Some(stored.task.clone())),
            None => Ok(None),
        }
    }

    async fn create_task(&self, owner: &Identity, task: NewTask) -> TaskEaseResult<Task> {
        self.commit(owner, |docs| {
            let now = docs.server_time();
            let seq = docs.next_seq;
            docs.next_seq += 1;
            let created = Task {
                id: Uuid::new_v4().to_string(),
                title: task.title,
                description: task.description,
                completed: false,
                created_at: now,
                updated_at: now,
                owner_id: owner.uid.clone(),
                priority: None,
                reason: None,
            };
            docs.tasks.insert(
                created.id.clone(),
                StoredTask {
                    seq,
                    task: created.clone(),
                },
            );
            Ok(created)
        })
        .await
    }

    async fn update_task(
        &self,
        owner: &Identity,
        task_id: &str,
        patch: &TaskPatch,
    ) -> TaskEaseResult<()> {
        self.commit(owner, |docs| {
            let now = docs.server_time();
            let task = docs.owned_mut(owner, task_id)?;
            task.apply(patch);
            task.updated_at = now;
            Ok(())
        })
        .await
    }

    async fn delete_task(&self, owner: &Identity, task_id: &str) -> TaskEaseResult<()> {
        self.commit(owner, |docs| {
            docs.owned_mut(owner, task_id)?;
            docs.tasks.remove(task_id);
            Ok(())
        })
        .await
    }

    async fn batch_update(&self, owner: &Identity, updates: &[BatchUpdate]) -> TaskEaseResult<()> {
        if updates.is_empty() {
            return Ok(());
        }
        self.commit(owner, |docs| {
            for update in updates {
                let task = docs
                    .owned_mut(owner, &update.task_id)
                    .map_err(|e| TaskEaseError::BatchRejected {
                        reason: e.to_string(),
                    })?;
                task.apply(&update.patch);
            }
            Ok(())
        })
        .await
    }
}
