use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    AGENT_TIMEOUT_SECS, DEFAULT_AVATAR, DEFAULT_DOCS_ROOT, DEFAULT_LEAK_MARKERS,
    DEFAULT_MAX_CONTEXT_TOKENS, DEFAULT_MAX_TOKENS, DEFAULT_ORG_KEYWORDS, DEFAULT_PLACEHOLDER,
    DEFAULT_SEED, DEFAULT_STREAM_DELAY_MS, DEFAULT_TEMPERATURE, DEFAULT_TERMINATION_PHRASES,
    DEFAULT_USER_NAME, HTTP_REQUEST_TIMEOUT_SECS, LANGUAGES, ORG_DIR, PERSONAL_DIR,
    PERSON_AVATAR, PROXY_AVATAR,
};

/// Main configuration structure, built once at startup and shared read-only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the markdown documents live
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Keyword and phrase lists used to route and filter conversations
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Agent backends
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Provider endpoints and timeouts
    #[serde(default)]
    pub llm: LlmConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,

    /// Context size limits
    #[serde(default)]
    pub context: ContextConfig,
}

/// Document directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    pub root: PathBuf,
    pub personal_dir: String,
    pub org_dir: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_DOCS_ROOT),
            personal_dir: PERSONAL_DIR.to_string(),
            org_dir: ORG_DIR.to_string(),
        }
    }
}

impl DocumentsConfig {
    pub fn personal_path(&self) -> PathBuf {
        self.root.join(&self.personal_dir)
    }

    pub fn org_path(&self) -> PathBuf {
        self.root.join(&self.org_dir)
    }
}

/// Static lists used for substring matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// A prompt containing any of these is organization-related
    pub org_keywords: Vec<String>,
    /// Generic-failure phrases for termination and stall detection
    pub termination_phrases: Vec<String>,
    /// Messages containing any of these are hidden from the user
    pub leak_markers: Vec<String>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            org_keywords: to_strings(DEFAULT_ORG_KEYWORDS),
            termination_phrases: to_strings(DEFAULT_TERMINATION_PHRASES),
            leak_markers: to_strings(DEFAULT_LEAK_MARKERS),
        }
    }
}

/// Supported provider families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Google,
}

/// Settings for one agent's backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    pub provider: Provider,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

/// The three agents of the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Answers organization-structure questions from the org charts
    pub graph: AgentSettings,
    /// Answers questions from personal notes
    pub text: AgentSettings,
    /// Home page guide
    pub coordinator: AgentSettings,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        let gemini = |key: &str| AgentSettings {
            provider: Provider::Google,
            model: "gemini-2.0-flash-lite".to_string(),
            api_key_env: key.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };

        Self {
            graph: gemini("GEMINI2_API_KEY"),
            text: gemini("GEMINI1_API_KEY"),
            coordinator: AgentSettings {
                provider: Provider::OpenAI,
                model: "gpt-4o-mini".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                temperature: DEFAULT_TEMPERATURE,
                max_tokens: DEFAULT_MAX_TOKENS,
            },
        }
    }
}

/// Provider endpoints and request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Override for the OpenAI base URL (e.g. a local proxy)
    pub openai_base_url: Option<String>,
    /// Override for the Gemini OpenAI-compatible base URL
    pub google_base_url: Option<String>,
    /// Per HTTP request timeout
    pub request_timeout_secs: u64,
    /// Upper bound for a whole agent conversation
    pub agent_timeout_secs: u64,
    /// Sampling seed forwarded to providers that honor it
    pub seed: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_base_url: None,
            google_base_url: None,
            request_timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
            agent_timeout_secs: AGENT_TIMEOUT_SECS,
            seed: Some(DEFAULT_SEED),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Name shown in the title bar
    pub user_name: String,
    /// Placeholder of the chat input
    pub placeholder: String,
    pub proxy_avatar: String,
    pub person_avatar: String,
    /// Avatar for roles with no dedicated mapping
    pub default_avatar: String,
    /// Delay between streamed words
    pub stream_delay_ms: u64,
    /// Language the agents answer in
    pub language: String,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            proxy_avatar: PROXY_AVATAR.to_string(),
            person_avatar: PERSON_AVATAR.to_string(),
            default_avatar: DEFAULT_AVATAR.to_string(),
            stream_delay_ms: DEFAULT_STREAM_DELAY_MS,
            language: LANGUAGES[0].to_string(),
        }
    }
}

/// Context size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Warn when an assembled prompt grows past this many tokens
    pub max_context_tokens: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: DEFAULT_MAX_CONTEXT_TOKENS,
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir()?;
    let global_config = config_dir.join("config.toml");
    let local_config = PathBuf::from(".mentor/config.toml");

    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    // MENTOR_UI__LANGUAGE=... style overrides
    figment = figment.merge(Env::prefixed("MENTOR_").split("__"));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from a single explicit file on top of the defaults
pub fn load_config_file(path: &Path) -> Result<Config> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "mentor") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("mentor");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config_file = config_dir.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    }

    let local_example = PathBuf::from(".mentor/config.toml.example");
    if !local_example.exists() {
        if let Some(parent) = local_example.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example_config = r#"# Mentor Project Configuration
# This file overrides global settings for this directory

[documents]
root = "uploaded_docs"

[ui]
user_name = "New Hire"
language = "English"
stream_delay_ms = 30

[agents.graph]
provider = "google"
model = "gemini-2.0-flash-lite"
api_key_env = "GEMINI2_API_KEY"
temperature = 0.7
max_tokens = 1024
"#;
        std::fs::write(&local_example, example_config)?;
        println!("Created example configuration at: {}", local_example.display());
    }

    Ok(())
}
