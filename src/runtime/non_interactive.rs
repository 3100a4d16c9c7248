use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use crate::{
    agents::{ChatMessage, Role},
    app::UIConfig,
    cli::OutputFormat,
    render::{to_markdown, write_history, FixedDelay, NoDelay},
    router::{ChatManager, Route},
    session::Page,
};

/// Result of a non-interactive run
#[derive(Debug, Serialize)]
pub struct NonInteractiveResult {
    /// The prompt that was answered
    pub prompt: String,
    pub page: Page,
    /// Which documents were used, absent on the home page
    pub route: Option<Route>,
    /// Messages safe to show, in order
    pub messages: Vec<ChatMessage>,
    pub summary: String,
    pub stalled: bool,
    /// Any errors that occurred
    pub errors: Vec<String>,
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Serialize)]
pub struct ExecutionMetadata {
    pub language: String,
    /// When the prompt was received
    pub started_at: DateTime<Local>,
    /// Execution time in milliseconds
    pub duration_ms: u128,
}

/// Answers a single prompt without the terminal UI
pub struct NonInteractiveRunner {
    manager: Arc<ChatManager>,
    page: Page,
    language: String,
}

impl NonInteractiveRunner {
    pub fn new(manager: Arc<ChatManager>, page: Page, language: impl Into<String>) -> Self {
        Self {
            manager,
            page,
            language: language.into(),
        }
    }

    /// Execute a single prompt. Failures are recorded in `errors` rather than returned.
    pub async fn execute(&self, prompt: String) -> NonInteractiveResult {
        let start_time = Instant::now();
        let started_at = Local::now();
        let language = Some(self.language.as_str());

        let result = match self.page {
            Page::Home => self.manager.home_response(&prompt, language).await,
            Page::Rag => self.manager.generate_response(&prompt, language).await,
        };

        let mut messages = vec![ChatMessage::new(Role::User, prompt.trim())];
        let (route, summary, stalled, errors) = match result {
            Ok(response) => {
                messages.extend(response.messages);
                (response.route, response.summary, response.stalled, Vec::new())
            }
            Err(e) => {
                error!("Prompt failed: {}", e);
                (None, String::new(), false, vec![e.user_message()])
            }
        };

        NonInteractiveResult {
            prompt,
            page: self.page,
            route,
            messages,
            summary,
            stalled,
            errors,
            metadata: ExecutionMetadata {
                language: self.language.clone(),
                started_at,
                duration_ms: start_time.elapsed().as_millis(),
            },
        }
    }

    /// Render a result as JSON or markdown
    pub fn format_result(result: &NonInteractiveResult, format: OutputFormat, ui: &UIConfig) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
            }),
            OutputFormat::Text | OutputFormat::Markdown => {
                let mut output = to_markdown(&result.messages, ui);

                if !result.errors.is_empty() {
                    output.push_str("\n## Errors\n\n");
                    for error in &result.errors {
                        output.push_str(&format!("- {}\n", error));
                    }
                }

                output.push_str("\n---\n");
                output.push_str(&format!(
                    "*{} | Page: {} | Language: {} | Duration: {}ms*\n",
                    result.metadata.started_at.format("%Y-%m-%d %H:%M"),
                    result.page.title(),
                    result.metadata.language,
                    result.metadata.duration_ms
                ));
                output
            }
        }
    }

    /// Print a result to stdout, streaming the newest message in text mode
    pub async fn print_result(
        &self,
        result: &NonInteractiveResult,
        format: OutputFormat,
        stream: bool,
    ) -> Result<()> {
        let ui = &self.manager.config().ui;

        if format != OutputFormat::Text {
            println!("{}", Self::format_result(result, format, ui));
            return Ok(());
        }

        let mut stdout = std::io::stdout();
        if stream {
            let pacer = FixedDelay::from_millis(ui.stream_delay_ms);
            write_history(&mut stdout, &result.messages, ui, &pacer, true).await?;
        } else {
            write_history(&mut stdout, &result.messages, ui, &NoDelay, true).await?;
        }

        for error in &result.errors {
            eprintln!("{}", error);
        }
        stdout.flush()?;
        Ok(())
    }
}
