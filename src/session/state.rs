use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::get_config_dir;

/// Top-level pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Guide to the application itself
    #[default]
    Home,
    /// Questions answered from the uploaded documents
    Rag,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Rag => "RAG Agent Space",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Page::Home => Page::Rag,
            Page::Rag => Page::Home,
        }
    }
}

/// Session state that persists between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub language: Option<String>,
    pub page: Option<Page>,
}

impl SessionState {
    /// Get the path to the session file
    fn session_file() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("session.toml"))
    }

    /// Load session state from disk
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::session_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save session state to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::session_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
