//! Title suggestion prompt template.

use serde::Serialize;

use super::PromptTemplate;
use crate::ai::schemas::SUGGESTED_TITLE_COUNT;

/// Template id
pub const SUGGEST_TITLES: &str = "suggest-titles";

/// Context for the suggest-titles prompt.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestTitlesContext {
    pub task_description: String,
    pub count: usize,
}

impl SuggestTitlesContext {
    pub fn new(task_description: impl Into<String>) -> Self {
        Self {
            task_description: task_description.into(),
            count: SUGGESTED_TITLE_COUNT,
        }
    }
}

pub fn template() -> PromptTemplate {
    PromptTemplate::new(SUGGEST_TITLES, SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Suggest short titles for a task description")
}

const SYSTEM_PROMPT: &str = r#"You write short, clear titles for to-do list items. A title names the action in at most a few words and never exceeds 100 characters.

Respond with a single JSON object and nothing else:
{
  "suggestedTitles": ["string", ...]
}"#;

const USER_PROMPT: &str = r#"Task description:
{{task_description}}

Suggest {{count}} different titles that fit this description."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_description_and_count() {
        let (system, user) = template()
            .render(&SuggestTitlesContext::new("Finish the quarterly report"))
            .unwrap();
        assert!(system.contains("suggestedTitles"));
        assert!(user.contains("Finish the quarterly report"));
        assert!(user.contains("Suggest 5 different titles"));
    }
}
