use super::traits::Model;
use super::unified::UnifiedModel;
use crate::app::{AgentSettings, Config, LlmConfig};
use crate::utils::MentorResult;

/// Factory for creating model instances using the unified LLM interface
pub struct ModelFactory;

impl ModelFactory {
    /// Create a model instance for one agent's settings
    pub fn create(settings: &AgentSettings, llm: &LlmConfig) -> MentorResult<Box<dyn Model>> {
        let model = UnifiedModel::new(settings, llm)?;
        Ok(Box::new(model))
    }

    /// Environment variables holding API keys, with whether each one is set
    pub fn api_key_status(config: &Config) -> Vec<(String, bool)> {
        let mut keys: Vec<String> = [
            &config.agents.graph,
            &config.agents.text,
            &config.agents.coordinator,
        ]
        .iter()
        .map(|settings| settings.api_key_env.clone())
        .collect();
        keys.sort();
        keys.dedup();

        keys.into_iter()
            .map(|name| {
                let set = std::env::var(&name).is_ok_and(|v| !v.trim().is_empty());
                (name, set)
            })
            .collect()
    }

    /// Validate that a model is accessible
    pub async fn validate(settings: &AgentSettings, llm: &LlmConfig) -> bool {
        match Self::create(settings, llm) {
            Ok(model) => model.validate_connection().await.unwrap_or(false),
            Err(_) => false,
        }
    }
}
