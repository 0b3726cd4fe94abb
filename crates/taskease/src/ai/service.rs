//! The prompt service: schema-checked structured calls to a text model.

use std::sync::Arc;

use async_trait::async_trait;

use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;
use super::prompts::{
    PrioritizeTasksContext, PromptManager, SuggestTitlesContext, PRIORITIZE_TASKS, SUGGEST_TITLES,
};
use super::provider::{parse_ai_response, AIMessage, AIProvider, AIResponse, GenerateOptions};
use super::schemas::{
    validate_prioritized, PrioritizedTask, SuggestTitlesInput, SuggestTitlesOutput,
    TaskToPrioritize,
};
use crate::entities::ModelSettings;
use crate::errors::{TaskEaseError, TaskEaseResult};

/// Hosted text generation with structured input and validated output.
#[async_trait]
pub trait PromptService: Send + Sync {
    /// Ask for title suggestions for a description.
    async fn suggest_titles(
        &self,
        input: &SuggestTitlesInput,
    ) -> TaskEaseResult<SuggestTitlesOutput>;

    /// Ask for a priority and reason for each task.
    async fn prioritize_tasks(
        &self,
        input: &[TaskToPrioritize],
    ) -> TaskEaseResult<Vec<PrioritizedTask>>;
}

/// Prompt service backed by an [`AIProvider`] and the built-in templates.
pub struct ProviderPromptService {
    provider: Arc<dyn AIProvider>,
    settings: ModelSettings,
    prompts: PromptManager,
}

impl ProviderPromptService {
    pub fn new(provider: Arc<dyn AIProvider>, settings: ModelSettings) -> Self {
        Self {
            provider,
            settings,
            prompts: PromptManager::default(),
        }
    }

    /// Build the provider named in `settings`, keyed from the environment.
    pub fn from_settings(settings: &ModelSettings) -> TaskEaseResult<Self> {
        let provider: Arc<dyn AIProvider> = match settings.provider.as_str() {
            "anthropic" => {
                let provider = AnthropicProvider::from_env();
                Arc::new(match &settings.base_url {
                    Some(url) => provider.with_base_url(url),
                    None => provider,
                })
            }
            "openai" => {
                let provider = OpenAIProvider::from_env();
                Arc::new(match &settings.base_url {
                    Some(url) => provider.with_base_url(url),
                    None => provider,
                })
            }
            other => {
                return Err(TaskEaseError::InvalidConfigValue {
                    key: "ai.provider".to_string(),
                    reason: format!("unknown provider '{other}'"),
                })
            }
        };

        if !provider.supports_model(&settings.model_id) {
            tracing::warn!(
                provider = provider.name(),
                model = %settings.model_id,
                "Model is not in the provider's known list; sending anyway"
            );
        }

        Ok(Self::new(provider, settings.clone()))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Environment variable the provider reads its key from
    pub fn api_key_env_var(&self) -> &'static str {
        self.provider.api_key_env_var()
    }

    fn options(&self, json_mode: bool) -> GenerateOptions {
        GenerateOptions {
            temperature: Some(self.settings.temperature),
            max_tokens: Some(self.settings.max_tokens),
            json_mode,
        }
    }

    async fn generate(
        &self,
        system: String,
        user: String,
        json_mode: bool,
    ) -> TaskEaseResult<AIResponse> {
        let messages = vec![AIMessage::system(system), AIMessage::user(user)];
        let response = self
            .provider
            .generate_text(&self.settings.model_id, &messages, &self.options(json_mode))
            .await?;
        tracing::debug!(
            provider = %response.provider,
            model = %response.model,
            tokens = response.usage.total_tokens,
            "Prompt completed"
        );
        Ok(response)
    }
}

#[async_trait]
impl PromptService for ProviderPromptService {
    async fn suggest_titles(
        &self,
        input: &SuggestTitlesInput,
    ) -> TaskEaseResult<SuggestTitlesOutput> {
        let context = SuggestTitlesContext::new(&input.task_description);
        let (system, user) = self.prompts.render(SUGGEST_TITLES, &context)?;

        let response = self.generate(system, user, true).await?;
        let output: SuggestTitlesOutput = parse_ai_response(&response)?;
        output.validate()?;
        Ok(output)
    }

    async fn prioritize_tasks(
        &self,
        input: &[TaskToPrioritize],
    ) -> TaskEaseResult<Vec<PrioritizedTask>> {
        let context = PrioritizeTasksContext {
            tasks: input.to_vec(),
        };
        let (system, user) = self.prompts.render(PRIORITIZE_TASKS, &context)?;

        // The output is a bare array, which JSON-object mode would refuse.
        let response = self.generate(system, user, false).await?;
        let records: Vec<PrioritizedTask> = parse_ai_response(&response)?;
        validate_prioritized(&records)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn anthropic_body(text: &str) -> serde_json::Value {
        json!({
            "content": [{"type": "text", "text": text}],
            "model": "claude-sonnet-4-20250514",
            "usage": {"input_tokens": 1, "output_tokens": 1}
        })
    }

    fn service_for(server: &MockServer) -> ProviderPromptService {
        let provider = AnthropicProvider::new("test-key").with_base_url(server.uri());
        ProviderPromptService::new(Arc::new(provider), ModelSettings::default())
    }

    #[tokio::test]
    async fn test_suggest_titles_parses_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_body(
                r#"{"suggestedTitles": ["A", "B", "C", "D", "E"]}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let service = service_for(&server);
        let output = service
            .suggest_titles(&SuggestTitlesInput {
                task_description: "Write the report".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(output.suggested_titles.len(), 5);
    }

    #[tokio::test]
    async fn test_prioritize_rejects_malformed_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(anthropic_body(r#"[{"title": "A", "priority": "high"}]"#)),
            )
            .mount(&server)
            .await;

        let service = service_for(&server);
        let err = service
            .prioritize_tasks(&[TaskToPrioritize {
                title: "A".to_string(),
                description: String::new(),
            }])
            .await
            .unwrap_err();
        assert!(matches!(err, TaskEaseError::AiResponseParseError { .. }));
    }

    #[test]
    fn test_unknown_provider_is_a_config_error() {
        let settings = ModelSettings {
            provider: "parrot".to_string(),
            ..ModelSettings::default()
        };
        assert!(matches!(
            ProviderPromptService::from_settings(&settings),
            Err(TaskEaseError::InvalidConfigValue { .. })
        ));
    }
}
