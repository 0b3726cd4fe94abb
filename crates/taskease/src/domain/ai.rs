//! AI Domain - title suggestion and prioritization for the task list.
//!
//! Prioritization is two steps. [`AIDomain::prioritize`] asks the prompt
//! service and returns a proposal without writing anything;
//! [`AIDomain::save_priorities`] merges the proposal into the store in
//! one atomic batch. A failed save leaves the proposal intact, so it can
//! be retried without asking the model again.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ai::{PrioritizedTask, PromptService, SuggestTitlesInput, TaskToPrioritize};
use crate::entities::{validate_description, Identity, Task, TaskPatch};
use crate::errors::{TaskEaseError, TaskEaseResult};
use crate::storage::{BatchUpdate, TaskStore};

/// Fewest active tasks worth prioritizing
pub const MIN_TASKS_TO_PRIORITIZE: usize = 2;

/// Model output for a set of active tasks, not yet persisted.
#[derive(Debug, Clone)]
pub struct PrioritizationProposal {
    tasks: Vec<Task>,
    records: Vec<PrioritizedTask>,
}

impl PrioritizationProposal {
    /// The active tasks that were sent, in list order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Records as returned by the model
    pub fn records(&self) -> &[PrioritizedTask] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Match records to tasks by title.
    ///
    /// Titles are looked up among the tasks that were sent; when two tasks
    /// share a title the later one in the list owns it. Records with no
    /// matching title are returned separately and are not an error.
    pub fn updates(&self) -> (Vec<BatchUpdate>, Vec<String>) {
        let by_title: HashMap<&str, &str> = self
            .tasks
            .iter()
            .map(|t| (t.title.as_str(), t.id.as_str()))
            .collect();

        let mut updates = Vec::new();
        let mut skipped = Vec::new();
        for record in &self.records {
            match by_title.get(record.title.as_str()) {
                Some(task_id) => updates.push(BatchUpdate::new(
                    *task_id,
                    TaskPatch::prioritized(record.priority, record.reason.clone()),
                )),
                None => skipped.push(record.title.clone()),
            }
        }
        (updates, skipped)
    }
}

/// Outcome of [`AIDomain::save_priorities`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Ids of the tasks that received a priority, first match order
    pub updated: Vec<String>,
    /// Titles from the model that matched no task
    pub skipped: Vec<String>,
}

/// AI Domain for AI-assisted task operations.
pub struct AIDomain {
    store: Arc<dyn TaskStore>,
    prompts: Arc<dyn PromptService>,
}

impl AIDomain {
    pub fn new(store: Arc<dyn TaskStore>, prompts: Arc<dyn PromptService>) -> Self {
        Self { store, prompts }
    }

    /// Suggest titles for a description.
    ///
    /// An empty description returns no suggestions and calls nothing.
    pub async fn suggest_titles(&self, description: &str) -> TaskEaseResult<Vec<String>> {
        if description.is_empty() {
            return Ok(Vec::new());
        }
        validate_description(description)?;

        let output = self
            .prompts
            .suggest_titles(&SuggestTitlesInput {
                task_description: description.to_string(),
            })
            .await?;
        tracing::debug!(count = output.suggested_titles.len(), "Titles suggested");
        Ok(output.suggested_titles)
    }

    /// Ask for priorities for the active tasks among `tasks`.
    ///
    /// Refused without any call when fewer than two tasks are active.
    pub async fn prioritize(&self, tasks: &[Task]) -> TaskEaseResult<PrioritizationProposal> {
        let active: Vec<Task> = tasks.iter().filter(|t| t.is_active()).cloned().collect();
        if active.len() < MIN_TASKS_TO_PRIORITIZE {
            return Err(TaskEaseError::PreconditionFailed {
                reason: "You need at least two active tasks to use the AI Prioritizer."
                    .to_string(),
            });
        }

        let input: Vec<TaskToPrioritize> = active
            .iter()
            .map(|t| TaskToPrioritize {
                title: t.title.clone(),
                description: t.description_or_empty().to_string(),
            })
            .collect();

        tracing::info!(count = input.len(), "Requesting prioritization");
        let records = self.prompts.prioritize_tasks(&input).await?;
        tracing::info!(returned = records.len(), "Prioritization received");

        Ok(PrioritizationProposal {
            tasks: active,
            records,
        })
    }

    /// Persist a proposal's priorities in one atomic batch.
    ///
    /// Never creates or deletes tasks; only priority and reason change.
    pub async fn save_priorities(
        &self,
        owner: &Identity,
        proposal: &PrioritizationProposal,
    ) -> TaskEaseResult<MergeReport> {
        let (updates, skipped) = proposal.updates();
        for title in &skipped {
            tracing::debug!(title = %title, "No task matches prioritized title; skipping");
        }

        if !updates.is_empty() {
            self.store.batch_update(owner, &updates).await?;
        }

        let mut updated: Vec<String> = Vec::with_capacity(updates.len());
        for update in updates {
            if !updated.contains(&update.task_id) {
                updated.push(update.task_id);
            }
        }
        tracing::info!(
            updated = updated.len(),
            skipped = skipped.len(),
            "Priorities saved"
        );
        Ok(MergeReport { updated, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            completed: false,
            created_at: now,
            updated_at: now,
            owner_id: "owner".to_string(),
            priority: None,
            reason: None,
        }
    }

    fn record(title: &str, priority: u32) -> PrioritizedTask {
        PrioritizedTask {
            title: title.to_string(),
            description: String::new(),
            priority,
            reason: format!("reason {priority}"),
        }
    }

    #[test]
    fn test_updates_match_by_title_and_skip_unknown() {
        let proposal = PrioritizationProposal {
            tasks: vec![task("1", "A"), task("2", "B")],
            records: vec![record("B", 1), record("C", 2)],
        };
        let (updates, skipped) = proposal.updates();
        assert_eq!(
            updates,
            vec![BatchUpdate::new("2", TaskPatch::prioritized(1, "reason 1"))]
        );
        assert_eq!(skipped, vec!["C".to_string()]);
    }

    #[test]
    fn test_duplicate_titles_resolve_to_one_task() {
        let proposal = PrioritizationProposal {
            tasks: vec![task("1", "Same"), task("2", "Same")],
            records: vec![record("Same", 1)],
        };
        let (updates, _) = proposal.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].task_id, "2");
    }

    #[test]
    fn test_retitled_record_is_skipped() {
        let proposal = PrioritizationProposal {
            tasks: vec![task("1", "Pay rent"), task("2", "Call mom")],
            records: vec![record("Pay the rent", 1), record("Call mom", 2)],
        };
        let (updates, skipped) = proposal.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(skipped, vec!["Pay the rent".to_string()]);
    }
}
