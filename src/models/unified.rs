use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::Model;
use super::types::{ApiMessage, ModelConfig, ModelResponse, TokenUsage};
use crate::app::{AgentSettings, LlmConfig, Provider};
use crate::constants::{GEMINI_OPENAI_BASE_URL, OPENAI_BASE_URL};
use crate::utils::{MentorError, MentorResult};

/// Model reached through an OpenAI-compatible chat completions endpoint.
/// Gemini is served through Google's OpenAI-compatible surface, so both
/// providers share this implementation.
pub struct UnifiedModel {
    client: Client,
    base_url: String,
    model_name: String,
    api_key: String,
}

impl UnifiedModel {
    /// Create a model for one agent's settings, reading its API key from the environment
    pub fn new(settings: &AgentSettings, llm: &LlmConfig) -> MentorResult<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| MentorError::MissingApiKey(settings.api_key_env.clone()))?;

        Self::with_key(settings, llm, api_key)
    }

    /// Create a model with an explicit API key
    pub fn with_key(settings: &AgentSettings, llm: &LlmConfig, api_key: String) -> MentorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(llm.request_timeout_secs))
            .build()
            .map_err(|e| MentorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url_for(settings.provider, llm),
            model_name: settings.model.clone(),
            api_key,
        })
    }
}

/// Endpoint for a provider, honoring configured overrides
pub fn base_url_for(provider: Provider, llm: &LlmConfig) -> String {
    let url = match provider {
        Provider::OpenAI => llm.openai_base_url.as_deref().unwrap_or(OPENAI_BASE_URL),
        Provider::Google => llm.google_base_url.as_deref().unwrap_or(GEMINI_OPENAI_BASE_URL),
    };
    url.trim_end_matches('/').to_string()
}

/// Map a non-success HTTP status to the error taxonomy
fn status_error(status: StatusCode, body: String) -> MentorError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        MentorError::ProviderQuotaExceeded(body)
    } else {
        MentorError::Provider {
            status: status.as_u16(),
            message: body,
        }
    }
}

/// Pull the first choice out of a completion body
fn parse_completion(body: &str) -> MentorResult<(String, Option<TokenUsage>)> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| MentorError::MalformedResponse("response has no choices".to_string()))?
        .message
        .content
        // Some providers send null content for an empty answer
        .unwrap_or_default();

    let usage = response.usage.map(|u| TokenUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok((content, usage))
}

#[async_trait]
impl Model for UnifiedModel {
    async fn chat(
        &self,
        messages: &[ApiMessage],
        config: &ModelConfig,
    ) -> MentorResult<ModelResponse> {
        let mut request_body = json!({
            "model": self.model_name,
            "messages": messages,
        });

        if let Some(temp) = config.temperature {
            request_body["temperature"] = json!(temp);
        }
        if let Some(max_tokens) = config.max_tokens {
            request_body["max_tokens"] = json!(max_tokens);
        }
        if let Some(seed) = config.seed {
            request_body["seed"] = json!(seed);
        }

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model_name, messages = messages.len(), "Sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| MentorError::Network(format!("Failed to reach {}: {}", self.base_url, e)))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(model = %self.model_name, status = status.as_u16(), "Provider rejected request");
            return Err(status_error(status, body));
        }

        let (content, usage) = parse_completion(&body)?;

        Ok(ModelResponse {
            content,
            usage,
            model_name: self.model_name.clone(),
        })
    }

    fn name(&self) -> &str {
        &self.model_name
    }

    async fn validate_connection(&self) -> MentorResult<bool> {
        let health_client = Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .map_err(|e| MentorError::Config(e.to_string()))?;

        let url = format!("{}/models", self.base_url);
        match health_client.get(&url).bearer_auth(&self.api_key).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

// Response structures (OpenAI format)

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AgentsConfig;

    #[test]
    fn test_base_url_overrides() {
        let mut llm = LlmConfig::default();
        assert_eq!(base_url_for(Provider::OpenAI, &llm), OPENAI_BASE_URL);
        assert_eq!(base_url_for(Provider::Google, &llm), GEMINI_OPENAI_BASE_URL);

        llm.openai_base_url = Some("http://localhost:4000/v1/".to_string());
        assert_eq!(base_url_for(Provider::OpenAI, &llm), "http://localhost:4000/v1");
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Alice reports to Bob."}}],
                       "usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#;
        let (content, usage) = parse_completion(body).unwrap();
        assert_eq!(content, "Alice reports to Bob.");
        assert_eq!(usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_parse_completion_without_choices_is_malformed() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, MentorError::MalformedResponse(_)));

        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, MentorError::MalformedResponse(_)));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "slow down".into()),
            MentorError::ProviderQuotaExceeded(_)
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key".into()),
            MentorError::Provider { status: 401, .. }
        ));
    }

    #[test]
    fn test_missing_key_is_reported() {
        let mut settings = AgentsConfig::default().graph;
        settings.api_key_env = "MENTOR_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = UnifiedModel::new(&settings, &LlmConfig::default()).err().unwrap();
        assert!(matches!(err, MentorError::MissingApiKey(name) if name == "MENTOR_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
