use serde::{Deserialize, Serialize};

use crate::app::AgentSettings;

/// Role of a message on the provider wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiRole {
    System,
    User,
    Assistant,
}

/// A message in an OpenAI-style chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: ApiRole,
    pub content: String,
}

impl ApiMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ApiRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ApiRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ApiRole::Assistant, content: content.into() }
    }
}

/// Configuration for model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            temperature: Some(crate::constants::DEFAULT_TEMPERATURE),
            max_tokens: Some(crate::constants::DEFAULT_MAX_TOKENS),
            seed: None,
        }
    }
}

impl ModelConfig {
    pub fn from_settings(settings: &AgentSettings, seed: Option<u64>) -> Self {
        Self {
            temperature: Some(settings.temperature),
            max_tokens: Some(settings.max_tokens),
            seed,
        }
    }
}

/// Response from a model
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// The actual response text
    pub content: String,
    /// Usage statistics if available
    pub usage: Option<TokenUsage>,
    /// Model that generated the response
    pub model_name: String,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}
