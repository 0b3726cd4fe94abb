//! Core data structures for the task list.

mod config;
mod identity;
mod task;

pub use config::{ModelSettings, TaskEaseConfig};
pub use identity::Identity;
pub use task::{
    partition, validate_description, validate_title, NewTask, PriorityBadge, Task, TaskPatch,
    MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS,
};
