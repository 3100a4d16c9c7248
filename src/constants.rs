/// Constants module to avoid magic numbers in the codebase

// Document store
pub const DEFAULT_DOCS_ROOT: &str = "uploaded_docs";
pub const PERSONAL_DIR: &str = "personal";
pub const ORG_DIR: &str = "org";
pub const MARKDOWN_EXTENSION: &str = "md";
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

// Routing
pub const DEFAULT_ORG_KEYWORDS: &[&str] = &[
    "org",
    "organization",
    "structure",
    "team",
    "manager",
    "lead",
    "report",
    "department",
    "chart",
];

pub const DEFAULT_TERMINATION_PHRASES: &[&str] = &[
    "I'm unable to provide",
    "I am sorry",
    "need more information",
    "please provide a question",
    "please clarify",
    "no relevant answer",
    "I apologize",
];

pub const DEFAULT_LEAK_MARKERS: &[&str] = &[
    "```mermaid",
    "# personal",
    "based on the following",
    "use the following",
];

/// How many trailing messages the stall detector inspects
pub const STALL_WINDOW: usize = 3;

pub const ORG_STALL_MESSAGE: &str = "Ending the chat as no relevant answer can be provided.";
pub const PERSONAL_STALL_MESSAGE: &str = "Ending the chat as no helpful answer can be provided.";

// Home page coordinator
pub const COORDINATOR_TERMINATION: &str = "ALL DONE";
pub const COORDINATOR_MAX_AUTO_REPLY: u32 = 2;

/// Hard cap on agent replies when a conversation sets no turn limit
pub const MAX_CONVERSATION_TURNS: u32 = 10;

// Reflection summary prompt used after a dispatch
pub const REFLECTION_PROMPT: &str =
    "Summarize the takeaway from the conversation. Do not add any introductory phrases.";

// Network Configuration
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_OPENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const AGENT_TIMEOUT_SECS: u64 = 180;

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
pub const DEFAULT_STREAM_DELAY_MS: u64 = 30;
pub const DEFAULT_USER_NAME: &str = "OMT Project Management Office, Business Planning";
pub const DEFAULT_PLACEHOLDER: &str = "Chat with On-boarding Mentor to start on-boarding";
pub const PROXY_AVATAR: &str = "🧠";
pub const PERSON_AVATAR: &str = "👩‍💼";
pub const DEFAULT_AVATAR: &str = "🤖";
pub const LANGUAGES: &[&str] = &["English", "繁體中文"];

// Default Model Configuration
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: usize = 1024;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 100_000;
