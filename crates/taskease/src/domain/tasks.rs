//! Tasks domain facade.

use std::sync::Arc;

use crate::entities::{validate_description, validate_title, Identity, NewTask, Task, TaskPatch};
use crate::errors::{TaskEaseError, TaskEaseResult};
use crate::storage::TaskStore;

/// Tasks domain facade providing the owner-initiated task operations
pub struct TasksDomain {
    store: Arc<dyn TaskStore>,
}

impl TasksDomain {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// The owner's tasks, newest first
    pub async fn list_tasks(&self, owner: &Identity) -> TaskEaseResult<Vec<Task>> {
        self.store.list_tasks(owner).await
    }

    /// Get a specific task by ID
    pub async fn get_task(&self, owner: &Identity, task_id: &str) -> TaskEaseResult<Task> {
        self.store
            .get_task(owner, task_id)
            .await?
            .ok_or_else(|| TaskEaseError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    /// Validate and create a task
    pub async fn add_task(
        &self,
        owner: &Identity,
        title: impl Into<String>,
        description: Option<String>,
    ) -> TaskEaseResult<Task> {
        let new_task = NewTask::new(title, description)?;
        let task = self.store.create_task(owner, new_task).await?;
        tracing::info!(task_id = %task.id, owner = %owner.uid, "Task created");
        Ok(task)
    }

    /// Replace a task's title and description
    pub async fn edit_task(
        &self,
        owner: &Identity,
        task_id: &str,
        title: impl Into<String>,
        description: Option<String>,
    ) -> TaskEaseResult<()> {
        let title = title.into();
        validate_title(&title)?;
        if let Some(description) = &description {
            validate_description(description)?;
        }

        self.store
            .update_task(owner, task_id, &TaskPatch::edit(title, description))
            .await?;
        tracing::info!(task_id, "Task updated");
        Ok(())
    }

    /// Flip the completion flag of `task`, returning the new value.
    ///
    /// Priority and reason are left alone.
    pub async fn toggle_complete(&self, owner: &Identity, task: &Task) -> TaskEaseResult<bool> {
        let completed = !task.completed;
        self.set_completed(owner, &task.id, completed).await?;
        Ok(completed)
    }

    pub async fn set_completed(
        &self,
        owner: &Identity,
        task_id: &str,
        completed: bool,
    ) -> TaskEaseResult<()> {
        self.store
            .update_task(owner, task_id, &TaskPatch::completed(completed))
            .await?;
        tracing::info!(
            task_id,
            completed,
            "Task {}",
            if completed { "completed" } else { "marked as active" }
        );
        Ok(())
    }

    /// Remove a task
    pub async fn delete_task(&self, owner: &Identity, task_id: &str) -> TaskEaseResult<()> {
        self.store.delete_task(owner, task_id).await?;
        tracing::info!(task_id, "Task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;

    fn setup() -> (TasksDomain, Identity) {
        let store = Arc::new(LocalStore::in_memory());
        (
            TasksDomain::new(store),
            Identity::new("uid-1", "ada@example.com"),
        )
    }

    #[tokio::test]
    async fn test_add_and_list_tasks() {
        let (domain, owner) = setup();
        domain.add_task(&owner, "Task 1", None).await.unwrap();
        domain
            .add_task(&owner, "Task 2", Some("details".to_string()))
            .await
            .unwrap();

        let tasks = domain.list_tasks(&owner).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Task 2");
        assert!(tasks.iter().all(|t| !t.completed && t.owner_id == "uid-1"));
    }

    #[tokio::test]
    async fn test_invalid_title_never_reaches_store() {
        let (domain, owner) = setup();
        let err = domain.add_task(&owner, "", None).await.unwrap_err();
        assert!(err.is_validation());
        assert!(domain.list_tasks(&owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let (domain, owner) = setup();
        let task = domain.add_task(&owner, "Task", None).await.unwrap();

        assert!(domain.toggle_complete(&owner, &task).await.unwrap());
        let task = domain.get_task(&owner, &task.id).await.unwrap();
        assert!(task.completed);

        assert!(!domain.toggle_complete(&owner, &task).await.unwrap());
        assert!(!domain.get_task(&owner, &task.id).await.unwrap().completed);
    }

    #[tokio::test]
    async fn test_edit_task() {
        let (domain, owner) = setup();
        let task = domain
            .add_task(&owner, "Old", Some("old text".to_string()))
            .await
            .unwrap();
        domain
            .edit_task(&owner, &task.id, "New", None)
            .await
            .unwrap();

        let edited = domain.get_task(&owner, &task.id).await.unwrap();
        assert_eq!(edited.title, "New");
        assert_eq!(edited.description, None);
        assert!(edited.updated_at >= task.updated_at);

        let err = domain
            .edit_task(&owner, &task.id, "x".repeat(101), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TaskEaseError::InvalidTitle { .. }));
    }

    #[tokio::test]
    async fn test_delete_task() {
        let (domain, owner) = setup();
        let task = domain.add_task(&owner, "Doomed", None).await.unwrap();
        domain.delete_task(&owner, &task.id).await.unwrap();
        assert!(matches!(
            domain.get_task(&owner, &task.id).await,
            Err(TaskEaseError::TaskNotFound { .. })
        ));
    }
}
