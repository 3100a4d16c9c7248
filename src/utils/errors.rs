use thiserror::Error;

/// Main error type for Mentor
#[derive(Error, Debug)]
pub enum MentorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error in {path}: {reason}")]
    Document { path: String, reason: String },

    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider quota exceeded: {0}")]
    ProviderQuotaExceeded(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Malformed response from provider: {0}")]
    MalformedResponse(String),

    #[error("Agent did not answer within {0} seconds")]
    Timeout(u64),
}

impl MentorError {
    /// Whether trying the same request again could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::ProviderQuotaExceeded(_) | Self::Timeout(_) => true,
            Self::Provider { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short text shown in the chat timeline instead of crashing the UI
    pub fn user_message(&self) -> String {
        let hint = if self.is_retryable() {
            "Please try again in a moment."
        } else {
            "Please check your configuration and try again."
        };
        format!("⚠️ {} {}", self, hint)
    }
}

impl From<reqwest::Error> for MentorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MentorError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

pub type MentorResult<T> = std::result::Result<T, MentorError>;
