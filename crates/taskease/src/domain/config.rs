//! Configuration domain facade.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::entities::{ModelSettings, TaskEaseConfig};
use crate::errors::{TaskEaseError, TaskEaseResult};

/// Reads and writes `.taskease/config.json`
pub struct ConfigDomain {
    config_path: PathBuf,
}

impl ConfigDomain {
    pub fn new(project_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: project_path.as_ref().join(".taskease/config.json"),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration; a missing file yields the defaults
    pub async fn load(&self) -> TaskEaseResult<TaskEaseConfig> {
        match fs::read_to_string(&self.config_path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TaskEaseConfig::default()),
            Err(e) => Err(TaskEaseError::FileReadError {
                path: self.config_path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub async fn save(&self, config: &TaskEaseConfig) -> TaskEaseResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content)
            .await
            .map_err(|e| TaskEaseError::FileWriteError {
                path: self.config_path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Replace the model settings
    pub async fn set_model(&self, settings: ModelSettings) -> TaskEaseResult<()> {
        if !(0.0..=1.0).contains(&settings.temperature) {
            return Err(TaskEaseError::InvalidConfigValue {
                key: "ai.temperature".to_string(),
                reason: format!("{} is outside 0.0..=1.0", settings.temperature),
            });
        }
        let mut config = self.load().await?;
        config.ai = settings;
        self.save(&config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let domain = ConfigDomain::new(temp_dir.path());

        let config = domain.load().await.unwrap();
        assert_eq!(config.ai, ModelSettings::default());
        assert_eq!(config.log_level, "warn");
    }

    #[tokio::test]
    async fn test_set_model() {
        let temp_dir = TempDir::new().unwrap();
        let domain = ConfigDomain::new(temp_dir.path());

        let settings = ModelSettings {
            provider: "openai".to_string(),
            model_id: "gpt-4o".to_string(),
            max_tokens: 2000,
            temperature: 0.5,
            base_url: None,
        };
        domain.set_model(settings.clone()).await.unwrap();

        let loaded = domain.load().await.unwrap();
        assert_eq!(loaded.ai, settings);
        assert_eq!(loaded.log_level, "warn");
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_temperature() {
        let temp_dir = TempDir::new().unwrap();
        let domain = ConfigDomain::new(temp_dir.path());
        let settings = ModelSettings {
            temperature: 1.5,
            ..ModelSettings::default()
        };
        assert!(domain.set_model(settings).await.is_err());
        assert!(!domain.config_path().exists());
    }
}
