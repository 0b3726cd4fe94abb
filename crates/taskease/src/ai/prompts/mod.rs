//! Prompt template system for AI operations.
//!
//! Handlebars templates with a system and a user part, one per prompt
//! the app sends.

use handlebars::Handlebars;
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::{TaskEaseError, TaskEaseResult};

mod prioritize_tasks;
mod suggest_titles;

pub use prioritize_tasks::{PrioritizeTasksContext, PRIORITIZE_TASKS};
pub use suggest_titles::{SuggestTitlesContext, SUGGEST_TITLES};

/// A prompt template with system and user messages.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub id: String,
    /// What the prompt asks for, shown in debug logs
    pub description: String,
    /// System prompt template
    pub system: String,
    /// User prompt template
    pub user: String,
}

impl PromptTemplate {
    pub fn new(id: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            system: system.into(),
            user: user.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render the template with the given context.
    pub fn render<T: Serialize>(&self, context: &T) -> TaskEaseResult<(String, String)> {
        tracing::debug!(prompt = %self.id, description = %self.description, "Rendering prompt");
        let mut handlebars = create_handlebars();

        handlebars
            .register_template_string("system", &self.system)
            .map_err(|e| TaskEaseError::Ai(format!("Invalid system template: {e}")))?;

        handlebars
            .register_template_string("user", &self.user)
            .map_err(|e| TaskEaseError::Ai(format!("Invalid user template: {e}")))?;

        let system = handlebars
            .render("system", context)
            .map_err(|e| TaskEaseError::Ai(format!("Failed to render system prompt: {e}")))?;

        let user = handlebars
            .render("user", context)
            .map_err(|e| TaskEaseError::Ai(format!("Failed to render user prompt: {e}")))?;

        Ok((system, user))
    }
}

fn create_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    // Helper: {{inc @index}} for 1-based numbering
    handlebars.register_helper(
        "inc",
        Box::new(
            |h: &handlebars::Helper,
             _: &Handlebars,
             _: &handlebars::Context,
             _: &mut handlebars::RenderContext,
             out: &mut dyn handlebars::Output| {
                let n = h.param(0).and_then(|v| v.value().as_u64()).unwrap_or(0);
                out.write(&(n + 1).to_string())?;
                Ok(())
            },
        ),
    );

    handlebars
}

/// Prompt manager for loading and rendering templates.
pub struct PromptManager {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptManager {
    /// Create a new prompt manager with the built-in templates.
    pub fn new() -> Self {
        let mut manager = Self {
            templates: HashMap::new(),
        };
        manager.register(suggest_titles::template());
        manager.register(prioritize_tasks::template());
        manager
    }

    /// Register a template, replacing any with the same id.
    pub fn register(&mut self, template: PromptTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.get(id)
    }

    /// Render a template with context.
    pub fn render<T: Serialize>(&self, id: &str, context: &T) -> TaskEaseResult<(String, String)> {
        let template = self
            .get(id)
            .ok_or_else(|| TaskEaseError::Ai(format!("Template '{id}' not found")))?;
        template.render(context)
    }
}

impl Default for PromptManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_rendering_does_not_escape() {
        let template = PromptTemplate::new("test", "You are a {{role}}", "{{text}}");
        let (system, user) = template
            .render(&json!({"role": "planner", "text": "Fix <b> & \"quotes\""}))
            .unwrap();
        assert_eq!(system, "You are a planner");
        assert_eq!(user, "Fix <b> & \"quotes\"");
    }

    #[test]
    fn test_inc_helper() {
        let template = PromptTemplate::new("test", "", "{{#each items}}{{inc @index}}.{{this}} {{/each}}");
        let (_, user) = template.render(&json!({"items": ["a", "b"]})).unwrap();
        assert_eq!(user, "1.a 2.b ");
    }

    #[test]
    fn test_prompt_manager_has_builtins() {
        let manager = PromptManager::new();
        assert!(manager.get(SUGGEST_TITLES).is_some());
        assert!(manager.get(PRIORITIZE_TASKS).is_some());
        assert!(manager.render("missing", &json!({})).is_err());
    }

    #[test]
    fn test_builtin_templates_are_described() {
        let manager = PromptManager::new();
        for id in [SUGGEST_TITLES, PRIORITIZE_TASKS] {
            let template = manager.get(id).unwrap();
            assert_eq!(template.id, id);
            assert!(!template.description.is_empty(), "{id} has no description");
        }
    }
}
