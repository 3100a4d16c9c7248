use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The person typing into the chat
    #[serde(rename = "user")]
    User,
    /// The mediating proxy that starts agent conversations
    #[serde(rename = "user_proxy")]
    Proxy,
    /// Organization-structure agent
    #[serde(rename = "GraphRAG_Agent")]
    GraphAgent,
    /// Personal-notes agent
    #[serde(rename = "TextRAG_Agent")]
    TextAgent,
    /// Home page coordinator, also used for anything without a dedicated role
    #[serde(rename = "assistant")]
    Assistant,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Proxy => "user_proxy",
            Role::GraphAgent => "GraphRAG_Agent",
            Role::TextAgent => "TextRAG_Agent",
            Role::Assistant => "assistant",
        }
    }

    /// The two document-grounded agents
    pub fn is_rag_agent(&self) -> bool {
        matches!(self, Role::GraphAgent | Role::TextAgent)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One message of a conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Messages with blank content stay in the history but are never shown
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// How the summary of a finished conversation is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMethod {
    /// The content of the last agent reply
    #[default]
    LastMessage,
    /// Ask the agent's model to summarize the takeaway
    ReflectionWithLlm,
}

/// Options for one proxy-initiated conversation
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Cap on agent replies; `None` runs until termination or the agent's own limit
    pub max_turns: Option<u32>,
    pub summary_method: SummaryMethod,
    /// Language the agent should answer in
    pub language: Option<String>,
}

/// Outcome of a conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResult {
    pub chat_history: Vec<ChatMessage>,
    pub summary: String,
}
