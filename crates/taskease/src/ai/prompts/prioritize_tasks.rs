//! Task prioritization prompt template.

use serde::Serialize;

use super::PromptTemplate;
use crate::ai::schemas::TaskToPrioritize;

/// Template id
pub const PRIORITIZE_TASKS: &str = "prioritize-tasks";

/// Context for the prioritize-tasks prompt.
#[derive(Debug, Clone, Serialize)]
pub struct PrioritizeTasksContext {
    pub tasks: Vec<TaskToPrioritize>,
}

pub fn template() -> PromptTemplate {
    PromptTemplate::new(PRIORITIZE_TASKS, SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Order tasks by importance and urgency")
}

const SYSTEM_PROMPT: &str = r#"You prioritize to-do lists by importance and urgency. For every task you are given, return the task with two added fields: "priority", a positive integer where 1 is the highest priority, and "reason", one sentence explaining the priority.

Copy each title exactly as given. Respond with a JSON array and nothing else:
[
  {"title": "string", "description": "string", "priority": 1, "reason": "string"}
]"#;

const USER_PROMPT: &str = r#"Tasks:
{{#each tasks}}
{{inc @index}}. Title: {{title}}
   Description: {{description}}
{{/each}}"#;
