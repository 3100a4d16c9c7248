use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::session::Page;

#[derive(Parser, Debug)]
#[command(name = "mentor")]
#[command(version)]
#[command(about = "An on-boarding mentor that answers from your organization charts and notes", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the `personal` and `org` document folders
    #[arg(short, long)]
    pub docs: Option<PathBuf>,

    /// Language the agents answer in (e.g. English, 繁體中文)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Page to open in the interactive UI
    #[arg(long, value_enum)]
    pub page: Option<Page>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Non-interactive prompt to answer
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    /// Print the answer at once instead of word by word
    #[arg(long, requires = "prompt")]
    pub no_stream: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Start a chat session (default)
    Chat,
    /// List the loaded documents
    Docs,
    /// Check API keys and document directories
    Status,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mode_flags() {
        let cli = Cli::try_parse_from([
            "mentor",
            "--prompt",
            "Who leads Sales?",
            "--output-format",
            "json",
            "--no-stream",
            "--lang",
            "繁體中文",
        ])
        .unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("Who leads Sales?"));
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert!(cli.no_stream);
        assert_eq!(cli.lang.as_deref(), Some("繁體中文"));
    }

    #[test]
    fn test_output_format_requires_prompt() {
        assert!(Cli::try_parse_from(["mentor", "--output-format", "json"]).is_err());
    }

    #[test]
    fn test_subcommand_and_page() {
        let cli = Cli::try_parse_from(["mentor", "--page", "rag", "docs"]).unwrap();
        assert_eq!(cli.page, Some(Page::Rag));
        assert_eq!(cli.command, Some(Commands::Docs));
    }
}
