//! Live task list: one owner's tasks, kept current from a live query.
//!
//! Every notification from the store carries the complete matching set
//! and replaces the held list wholesale; there is no diffing.

use std::sync::Arc;

use tokio::sync::watch;

use crate::entities::{Identity, Task};
use crate::errors::TaskEaseError;
use crate::storage::{Snapshot, Subscription, TaskStore};

/// Lifecycle of a [`LiveTaskList`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveState {
    /// No identity has been attached yet
    Uninitialized,
    /// A live query is open
    Subscribed,
    /// The live query failed; nothing is retried until `attach` is called again
    Error(String),
    /// Released by sign-out or by the consumer
    TornDown,
}

/// Reconciled view of one owner's tasks.
///
/// The subscription handle is owned here, so dropping the list (or
/// attaching a different identity) always releases the live query.
pub struct LiveTaskList {
    store: Arc<dyn TaskStore>,
    identity: Option<Identity>,
    subscription: Option<Subscription>,
    tasks: Vec<Task>,
    loading: bool,
    state: LiveState,
}

impl LiveTaskList {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            identity: None,
            subscription: None,
            tasks: Vec::new(),
            loading: false,
            state: LiveState::Uninitialized,
        }
    }

    /// Open a live query for `identity`, releasing any previous one.
    ///
    /// On failure the list is left empty in the `Error` state.
    pub async fn attach(&mut self, identity: &Identity) -> Result<(), TaskEaseError> {
        self.subscription = None;
        self.tasks.clear();
        self.identity = Some(identity.clone());
        self.loading = true;

        match self.store.subscribe(identity).await {
            Ok(subscription) => {
                tracing::debug!(owner = %identity.uid, "Live task list attached");
                self.subscription = Some(subscription);
                self.state = LiveState::Subscribed;
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Release the live query and clear the list.
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!("Live task list detached");
        }
        self.tasks.clear();
        self.identity = None;
        self.loading = false;
        self.state = LiveState::TornDown;
    }

    /// Attach, re-attach or detach to match the signed-in identity.
    pub async fn set_identity(&mut self, identity: Option<&Identity>) -> Result<(), TaskEaseError> {
        match identity {
            None => {
                self.detach();
                Ok(())
            }
            Some(identity)
                if self.state == LiveState::Subscribed
                    && self.identity.as_ref() == Some(identity) =>
            {
                Ok(())
            }
            Some(identity) => self.attach(identity).await,
        }
    }

    /// Wait for the next session change and follow it.
    ///
    /// Returns `false` once the session stream has ended; the list is
    /// detached at that point.
    pub async fn follow_session(
        &mut self,
        session: &mut watch::Receiver<Option<Identity>>,
    ) -> bool {
        if session.changed().await.is_err() {
            self.detach();
            return false;
        }
        let identity = session.borrow_and_update().clone();
        // Failures are recorded in `state`; the stream itself is still alive.
        let _ = self.set_identity(identity.as_ref()).await;
        true
    }

    /// Wait for the next store notification and apply it.
    ///
    /// Returns `false` without waiting when no live query is open.
    pub async fn next_update(&mut self) -> bool {
        let event = match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => return false,
        };
        self.apply(event);
        true
    }

    /// Apply every notification that has already arrived, without waiting.
    pub fn drain_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.subscription.as_mut().and_then(Subscription::try_next) {
            self.apply(Some(event));
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: Option<Snapshot>) {
        match event {
            Some(Ok(tasks)) => {
                tracing::trace!(count = tasks.len(), "Snapshot received");
                self.tasks = tasks;
                self.loading = false;
            }
            Some(Err(e)) => self.fail(&e),
            None => self.fail(&TaskEaseError::SubscriptionFailed {
                reason: "live query closed by the store".to_string(),
            }),
        }
    }

    fn fail(&mut self, error: &TaskEaseError) {
        tracing::warn!(error = %error, "Live task list stopped");
        self.subscription = None;
        self.tasks.clear();
        self.loading = false;
        self.state = LiveState::Error(error.to_string());
    }

    /// All tasks, `createdAt` descending
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks not yet completed, in list order
    pub fn active(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    /// Completed tasks, in list order
    pub fn completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    /// True between attaching and the first snapshot
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> &LiveState {
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewTask;
    use crate::storage::LocalStore;

    fn ada() -> Identity {
        Identity::new("ada", "ada@example.com")
    }

    #[tokio::test]
    async fn test_attach_then_first_snapshot_ends_loading() {
        let store = Arc::new(LocalStore::in_memory());
        store
            .create_task(&ada(), NewTask::new("a", None).unwrap())
            .await
            .unwrap();

        let mut list = LiveTaskList::new(store);
        assert_eq!(list.state(), &LiveState::Uninitialized);

        list.attach(&ada()).await.unwrap();
        assert!(list.is_loading());
        assert!(list.next_update().await);
        assert!(!list.is_loading());
        assert_eq!(list.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_stream_is_an_error_state() {
        let (tx, subscription) = Subscription::channel();
        drop(tx);

        let mut list = LiveTaskList::new(Arc::new(LocalStore::in_memory()));
        list.subscription = Some(subscription);
        list.state = LiveState::Subscribed;

        assert!(list.next_update().await);
        assert!(matches!(list.state(), LiveState::Error(_)));
        assert!(list.tasks().is_empty());
        assert!(!list.next_update().await);
    }

    #[tokio::test]
    async fn test_detach_releases_subscription() {
        let store = Arc::new(LocalStore::in_memory());
        let mut list = LiveTaskList::new(Arc::clone(&store) as Arc<dyn TaskStore>);
        list.attach(&ada()).await.unwrap();
        assert_eq!(store.subscriber_count(), 1);

        list.detach();
        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(list.state(), &LiveState::TornDown);
    }
}
