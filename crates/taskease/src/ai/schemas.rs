//! Structured input and output of the prompt service.
//!
//! Outputs are checked with `validate()` after deserialization; a
//! response that fails either step is rejected before anything is written.

use serde::{Deserialize, Serialize};

use crate::errors::{TaskEaseError, TaskEaseResult};

/// Number of titles requested per suggestion call
pub const SUGGESTED_TITLE_COUNT: usize = 5;

/// Input of the title-suggestion prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTitlesInput {
    pub task_description: String,
}

/// Output of the title-suggestion prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTitlesOutput {
    pub suggested_titles: Vec<String>,
}

impl SuggestTitlesOutput {
    pub fn validate(&self) -> TaskEaseResult<()> {
        if self.suggested_titles.len() != SUGGESTED_TITLE_COUNT {
            // Count is requested, not enforced; the titles are advisory.
            tracing::warn!(
                count = self.suggested_titles.len(),
                "Model returned an unexpected number of titles"
            );
        }
        Ok(())
    }
}

/// One task as sent for prioritization; identifiers are never sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskToPrioritize {
    pub title: String,
    pub description: String,
}

/// One prioritized record returned by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritizedTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 1 is the most urgent/important
    pub priority: u32,
    pub reason: String,
}

/// Check every record of a prioritization response.
pub fn validate_prioritized(records: &[PrioritizedTask]) -> TaskEaseResult<()> {
    if let Some(bad) = records.iter().find(|r| r.priority == 0) {
        return Err(TaskEaseError::AiResponseParseError {
            reason: format!("priority must be a positive integer (task '{}')", bad.title),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_output_uses_camel_case() {
        let output: SuggestTitlesOutput =
            serde_json::from_str(r#"{"suggestedTitles": ["a", "b"]}"#).unwrap();
        assert_eq!(output.suggested_titles, vec!["a", "b"]);
        assert!(output.validate().is_ok());
    }

    #[test]
    fn test_negative_priority_fails_to_parse() {
        let parsed: Result<Vec<PrioritizedTask>, _> = serde_json::from_str(
            r#"[{"title": "a", "description": "", "priority": -1, "reason": "r"}]"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_zero_priority_is_rejected() {
        let records = vec![PrioritizedTask {
            title: "a".to_string(),
            description: String::new(),
            priority: 0,
            reason: "r".to_string(),
        }];
        assert!(validate_prioritized(&records).is_err());
    }
}
