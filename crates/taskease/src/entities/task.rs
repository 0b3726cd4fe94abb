//! Task entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{TaskEaseError, TaskEaseResult};

/// Maximum title length, in characters
pub const MAX_TITLE_CHARS: usize = 100;

/// Maximum description length, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// A persisted task document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier, never reused
    pub id: String,

    /// Short, non-empty title
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub completed: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Identity that created the task; never changes
    pub owner_id: String,

    /// AI-assigned priority, 1 is highest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    /// Why the priority was assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Task {
    /// Whether the task is still active (not completed)
    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Description as sent to the prompt service: absent becomes empty.
    pub fn description_or_empty(&self) -> &str {
        match &self.description {
            Some(description) => description.as_str(),
            None => "",
        }
    }

    /// Badge to display next to the task, if any.
    ///
    /// Completed tasks keep their priority but do not show it.
    pub fn badge(&self) -> Option<PriorityBadge> {
        if self.completed {
            return None;
        }
        self.priority.map(PriorityBadge::from_priority)
    }

    /// Apply a patch in place. `owner_id`, `id` and `created_at` are untouchable.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = Some(priority);
        }
        if let Some(reason) = &patch.reason {
            self.reason = Some(reason.clone());
        }
    }
}

/// Fields supplied by the client when creating a task.
///
/// Identifier, owner and timestamps are filled in by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

impl NewTask {
    /// Build and validate a new task.
    pub fn new(title: impl Into<String>, description: Option<String>) -> TaskEaseResult<Self> {
        let title = title.into();
        validate_title(&title)?;
        if let Some(description) = &description {
            validate_description(description)?;
        }
        Ok(Self { title, description })
    }
}

/// A partial update of a task.
///
/// `description` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<u32>,
    pub reason: Option<String>,
}

impl TaskPatch {
    /// Patch that sets the completion flag
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Patch that replaces title and description
    pub fn edit(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description),
            ..Self::default()
        }
    }

    /// Patch written by the prioritization merge
    pub fn prioritized(priority: u32, reason: impl Into<String>) -> Self {
        Self {
            priority: Some(priority),
            reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Display class for an assigned priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityBadge {
    /// Priority 1
    Urgent,
    /// Priority 2
    High,
    /// Anything lower
    Normal,
}

impl PriorityBadge {
    pub fn from_priority(priority: u32) -> Self {
        match priority {
            1 => Self::Urgent,
            2 => Self::High,
            _ => Self::Normal,
        }
    }
}

/// Split a snapshot into (active, completed), preserving order.
///
/// Every task lands in exactly one of the two halves.
pub fn partition(tasks: &[Task]) -> (Vec<&Task>, Vec<&Task>) {
    tasks.iter().partition(|t| t.is_active())
}

/// Check a title: non-empty and at most [`MAX_TITLE_CHARS`] characters.
pub fn validate_title(title: &str) -> TaskEaseResult<()> {
    if title.is_empty() {
        return Err(TaskEaseError::InvalidTitle {
            reason: "Title is required".to_string(),
        });
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(TaskEaseError::InvalidTitle {
            reason: "Title is too long".to_string(),
        });
    }
    Ok(())
}

/// Check a description: at most [`MAX_DESCRIPTION_CHARS`] characters.
pub fn validate_description(description: &str) -> TaskEaseResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(TaskEaseError::InvalidDescription {
            reason: "Description is too long".to_string(),
        });
    }
    Ok(())
}
