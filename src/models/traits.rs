use async_trait::async_trait;

use super::types::{ApiMessage, ModelConfig, ModelResponse};
use crate::utils::MentorResult;

/// Core trait that all model backends must implement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Model: Send + Sync {
    /// Send a chat conversation to the model and get a response
    async fn chat(
        &self,
        messages: &[ApiMessage],
        config: &ModelConfig,
    ) -> MentorResult<ModelResponse>;

    /// Get the name of the model
    fn name(&self) -> &str;

    /// Validate that the model is accessible
    async fn validate_connection(&self) -> MentorResult<bool> {
        Ok(true)
    }
}
