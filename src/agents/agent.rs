use tracing::debug;

use super::types::{ChatMessage, Role};
use crate::constants::REFLECTION_PROMPT;
use crate::models::{ApiMessage, Model, ModelConfig};
use crate::utils::MentorResult;

/// An agent configured with a system prompt and an LLM backend
pub struct ConversableAgent {
    role: Role,
    system_message: String,
    model: Box<dyn Model>,
    config: ModelConfig,
    max_consecutive_auto_reply: Option<u32>,
}

impl ConversableAgent {
    pub fn new(
        role: Role,
        system_message: impl Into<String>,
        model: Box<dyn Model>,
        config: ModelConfig,
    ) -> Self {
        Self {
            role,
            system_message: system_message.into(),
            model,
            config,
            max_consecutive_auto_reply: None,
        }
    }

    /// Limit how many replies the agent gives in a single conversation
    pub fn with_max_consecutive_auto_reply(mut self, limit: u32) -> Self {
        self.max_consecutive_auto_reply = Some(limit);
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn name(&self) -> &'static str {
        self.role.name()
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn max_consecutive_auto_reply(&self) -> Option<u32> {
        self.max_consecutive_auto_reply
    }

    /// Produce the agent's next reply to the conversation so far
    pub async fn generate_reply(
        &self,
        history: &[ChatMessage],
        language: Option<&str>,
    ) -> MentorResult<String> {
        let messages = self.wire_messages(history, language);
        let response = self.model.chat(&messages, &self.config).await?;

        debug!(
            agent = self.name(),
            model = %response.model_name,
            tokens = response.usage.map(|u| u.total_tokens),
            "Agent replied"
        );

        Ok(response.content)
    }

    /// Summarize the takeaway of a finished conversation
    pub async fn reflect(&self, history: &[ChatMessage], language: Option<&str>) -> MentorResult<String> {
        let mut messages = self.wire_messages(history, language);
        messages.push(ApiMessage::user(REFLECTION_PROMPT));
        let response = self.model.chat(&messages, &self.config).await?;
        Ok(response.content)
    }

    /// The agent sees its own messages as assistant turns and everyone else's as user turns
    fn wire_messages(&self, history: &[ChatMessage], language: Option<&str>) -> Vec<ApiMessage> {
        let system = match language {
            Some(language) => format!("{}\nPlease express in {}.", self.system_message, language),
            None => self.system_message.clone(),
        };

        let mut messages = vec![ApiMessage::system(system)];
        messages.extend(history.iter().filter(|m| !m.is_blank()).map(|m| {
            if m.role == self.role {
                ApiMessage::assistant(m.content.clone())
            } else {
                ApiMessage::user(m.content.clone())
            }
        }));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiRole, MockModel, ModelResponse};

    fn reply(text: &str) -> ModelResponse {
        ModelResponse {
            content: text.to_string(),
            usage: None,
            model_name: "mock".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_reply_maps_roles() {
        let mut model = MockModel::new();
        model
            .expect_chat()
            .withf(|messages, _| {
                messages.len() == 3
                    && messages[0].role == ApiRole::System
                    && messages[0].content.ends_with("Please express in English.")
                    && messages[1].role == ApiRole::User
                    && messages[2].role == ApiRole::Assistant
            })
            .times(1)
            .returning(|_, _| Ok(reply("Alice leads the team.")));

        let agent = ConversableAgent::new(
            Role::GraphAgent,
            "You answer org questions.",
            Box::new(model),
            ModelConfig::default(),
        );

        let history = vec![
            ChatMessage::new(Role::Proxy, "Who leads?"),
            ChatMessage::new(Role::Proxy, "   "),
            ChatMessage::new(Role::GraphAgent, "Let me check."),
        ];
        let text = agent.generate_reply(&history, Some("English")).await.unwrap();
        assert_eq!(text, "Alice leads the team.");
    }

    #[tokio::test]
    async fn test_reflect_appends_summary_prompt() {
        let mut model = MockModel::new();
        model
            .expect_chat()
            .withf(|messages, _| {
                messages.last().is_some_and(|m| m.content == REFLECTION_PROMPT)
            })
            .returning(|_, _| Ok(reply("Alice leads.")));

        let agent = ConversableAgent::new(Role::TextAgent, "notes", Box::new(model), ModelConfig::default());
        let summary = agent
            .reflect(&[ChatMessage::new(Role::Proxy, "q")], None)
            .await
            .unwrap();
        assert_eq!(summary, "Alice leads.");
    }
}
