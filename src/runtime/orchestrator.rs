use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::sync::Arc;
use tracing::warn;

use crate::{
    app::{get_config_dir, load_config, load_config_file, Config},
    cli::{handle_command, Cli, Commands},
    constants::LANGUAGES,
    router::ChatManager,
    session::{Page, SessionState},
    tui::{run_ui, App},
    utils::{init_file_logger, init_logger, log_progress},
};

use super::non_interactive::NonInteractiveRunner;

/// Load configuration for a CLI invocation and apply its overrides
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config_file(config_path)?
    } else {
        match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    };

    if let Some(docs) = &cli.docs {
        config.documents.root = docs.clone();
    }
    if let Some(lang) = &cli.lang {
        config.ui.language = lang.clone();
    }
    if !is_supported_language(&config.ui.language) {
        bail!(
            "Unsupported language '{}'; choose one of: {}",
            config.ui.language,
            LANGUAGES.join(", ")
        );
    }

    Ok(config)
}

fn is_supported_language(language: &str) -> bool {
    LANGUAGES.contains(&language)
}

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
    session: SessionState,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        let session = SessionState::load().unwrap_or_default();

        Ok(Self {
            cli,
            config,
            session,
        })
    }

    /// Page to open: CLI flag, then the last session, then home
    fn page(&self) -> Page {
        self.cli.page.or(self.session.page).unwrap_or_default()
    }

    /// Language to answer in: CLI flag, then the last session, then config
    fn language(&self) -> String {
        self.cli
            .lang
            .clone()
            .or_else(|| {
                self.session
                    .language
                    .clone()
                    .filter(|l| is_supported_language(l))
            })
            .unwrap_or_else(|| self.config.ui.language.clone())
    }

    /// Interactive runs hand the terminal to the TUI
    fn is_interactive(&self) -> bool {
        self.cli.prompt.is_none() && matches!(self.cli.command, None | Some(Commands::Chat))
    }

    /// Run the orchestrator
    pub async fn run(mut self) -> Result<()> {
        if self.is_interactive() {
            // The TUI owns the terminal, so logs go to a file
            let log_path = get_config_dir()?.join("mentor.log");
            if let Err(e) = init_file_logger(&log_path, self.cli.verbose) {
                eprintln!("⚠️  Could not open log file {}: {}", log_path.display(), e);
            }
        } else {
            init_logger(self.cli.verbose);
        }

        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(());
            }
        }

        if let Some(prompt) = self.cli.prompt.clone() {
            let manager = self.manager()?;
            return self.run_prompt(manager, prompt).await;
        }

        log_progress(1, 2, "Setting up agents");
        let manager = self.manager()?;
        log_progress(
            2,
            2,
            format!(
                "Starting the on-boarding mentor with documents from {}",
                self.config.documents.root.display().to_string().green()
            ),
        );

        let app = App::new(manager, self.page(), &self.language());
        let app = run_ui(app).await?;

        self.session.page = Some(app.page);
        self.session.language = Some(app.language_name().to_string());
        if let Err(e) = self.session.save() {
            warn!("Failed to save session: {}", e);
        }

        Ok(())
    }

    fn manager(&self) -> Result<Arc<ChatManager>> {
        let manager = ChatManager::new(Arc::new(self.config.clone()))
            .context("Failed to set up the agents")?;
        Ok(Arc::new(manager))
    }

    async fn run_prompt(&self, manager: Arc<ChatManager>, prompt: String) -> Result<()> {
        // Prompt mode starts on the document page unless asked otherwise
        let page = self.cli.page.unwrap_or(Page::Rag);
        let runner = NonInteractiveRunner::new(manager, page, self.language());
        let result = runner.execute(prompt).await;

        runner
            .print_result(&result, self.cli.output_format, !self.cli.no_stream)
            .await?;

        if !result.errors.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nlanguage = \"English\"\n").unwrap();

        let cli = Cli::parse_from([
            "mentor",
            "--config",
            path.to_str().unwrap(),
            "--docs",
            "/srv/docs",
            "--lang",
            "繁體中文",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.documents.root, PathBuf::from("/srv/docs"));
        assert_eq!(config.ui.language, "繁體中文");
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let cli = Cli::parse_from(["mentor", "--config", path.to_str().unwrap(), "--lang", "French"]);
        let err = resolve_config(&cli).unwrap_err();
        assert!(err.to_string().contains("French"));

        std::fs::write(&path, "[ui]\nlanguage = \"Klingon\"\n").unwrap();
        let cli = Cli::parse_from(["mentor", "--config", path.to_str().unwrap()]);
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn test_stale_session_language_falls_back_to_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nlanguage = \"繁體中文\"\n").unwrap();

        let cli = Cli::parse_from(["mentor", "--config", path.to_str().unwrap()]);
        let orchestrator = Orchestrator {
            config: resolve_config(&cli).unwrap(),
            session: SessionState {
                language: Some("French".to_string()),
                page: None,
            },
            cli,
        };
        assert_eq!(orchestrator.language(), "繁體中文");
    }
}
