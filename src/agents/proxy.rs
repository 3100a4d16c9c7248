use std::time::Instant;
use tracing::{debug, info};

use super::agent::ConversableAgent;
use super::types::{ChatMessage, ChatOptions, ChatResult, Role, SummaryMethod};
use crate::constants::MAX_CONVERSATION_TURNS;
use crate::utils::MentorResult;

/// Decides whether a received message ends the conversation
pub type TerminationPredicate = Box<dyn Fn(&ChatMessage) -> bool + Send + Sync>;

/// Mediating agent that starts a turn-limited conversation and never asks a human
pub struct UserProxy {
    is_termination_msg: TerminationPredicate,
}

impl UserProxy {
    pub fn new(is_termination_msg: TerminationPredicate) -> Self {
        Self { is_termination_msg }
    }

    /// Terminate when a reply contains any of `phrases`, ignoring case
    pub fn terminating_on_phrases(phrases: &[String]) -> Self {
        let phrases: Vec<String> = phrases.iter().map(|p| p.to_lowercase()).collect();
        Self::new(Box::new(move |msg: &ChatMessage| {
            let content = msg.content.to_lowercase();
            phrases.iter().any(|phrase| content.contains(phrase))
        }))
    }

    /// Terminate when a reply contains `marker` verbatim
    pub fn terminating_on(marker: &str) -> Self {
        let marker = marker.to_string();
        Self::new(Box::new(move |msg: &ChatMessage| msg.content.contains(&marker)))
    }

    pub fn is_termination_msg(&self, msg: &ChatMessage) -> bool {
        (self.is_termination_msg)(msg)
    }

    /// Send `message` to `agent` and keep the exchange going until the turn cap,
    /// a termination message, or the agent's own reply budget ends it.
    pub async fn initiate_chat(
        &self,
        agent: &ConversableAgent,
        message: impl Into<String>,
        options: &ChatOptions,
    ) -> MentorResult<ChatResult> {
        let started = Instant::now();
        let language = options.language.as_deref();
        let max_turns = options.max_turns.unwrap_or(MAX_CONVERSATION_TURNS);

        let mut history = vec![ChatMessage::new(Role::Proxy, message)];
        let mut replies = 0u32;

        loop {
            if agent
                .max_consecutive_auto_reply()
                .is_some_and(|limit| replies >= limit)
            {
                debug!(agent = agent.name(), "Agent reached its auto-reply limit");
                break;
            }

            let content = agent.generate_reply(&history, language).await?;
            replies += 1;

            let reply = ChatMessage::new(agent.role(), content);
            let terminated = self.is_termination_msg(&reply);
            history.push(reply);

            if terminated {
                debug!(agent = agent.name(), "Termination message received");
                break;
            }
            if replies >= max_turns {
                break;
            }

            // The proxy never asks a human, so its turn is an empty auto reply
            history.push(ChatMessage::new(Role::Proxy, ""));
        }

        let summary = match options.summary_method {
            SummaryMethod::LastMessage => history
                .iter()
                .rev()
                .find(|m| m.role == agent.role())
                .map(|m| m.content.clone())
                .unwrap_or_default(),
            SummaryMethod::ReflectionWithLlm => agent.reflect(&history, language).await?,
        };

        info!(
            agent = agent.name(),
            replies,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Conversation finished"
        );

        Ok(ChatResult {
            chat_history: history,
            summary,
        })
    }
}
