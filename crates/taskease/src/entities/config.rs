//! Configuration entities.

use serde::{Deserialize, Serialize};

/// Main configuration structure (`.taskease/config.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEaseConfig {
    /// Model used for title suggestion and prioritization
    #[serde(default)]
    pub ai: ModelSettings,

    /// Display name shown by the CLI
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "appName")]
    pub app_name: Option<String>,

    /// Tracing filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level", rename = "logLevel")]
    pub log_level: String,
}

impl Default for TaskEaseConfig {
    fn default() -> Self {
        Self {
            ai: ModelSettings::default(),
            app_name: None,
            log_level: default_log_level(),
        }
    }
}

/// Settings for the text-generation model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Provider name ("anthropic" or "openai")
    pub provider: String,

    /// Model ID
    #[serde(rename = "modelId")]
    pub model_id: String,

    /// Maximum tokens
    #[serde(default = "default_max_tokens", rename = "maxTokens")]
    pub max_tokens: u32,

    /// Temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional base URL override
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "baseURL")]
    pub base_url: Option<String>,
}

const fn default_max_tokens() -> u32 {
    4096
}

const fn default_temperature() -> f32 {
    0.2
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model_id: "claude-sonnet-4-20250514".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_settings_default() {
        let settings = ModelSettings::default();
        assert_eq!(settings.provider, "anthropic");
        assert_eq!(settings.max_tokens, 4096);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: TaskEaseConfig =
            serde_json::from_str(r#"{"ai": {"provider": "openai", "modelId": "gpt-4o"}}"#)
                .unwrap();
        assert_eq!(config.ai.provider, "openai");
        assert_eq!(config.ai.max_tokens, 4096);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_default_matches_empty_file() {
        let parsed: TaskEaseConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(TaskEaseConfig::default(), parsed);
        assert_eq!(TaskEaseConfig::default().log_level, "warn");
    }
}
