use colored::Colorize;
use std::io::{self, Write};

use super::avatar::{avatar_for, display_text, visible_entries};
use super::stream::{Pacer, WordStream};
use crate::agents::{ChatMessage, Role};
use crate::app::UIConfig;

/// Speaker label, e.g. `🧠 user_proxy:`
fn label(message: &ChatMessage, ui: &UIConfig, color: bool) -> String {
    let avatar = avatar_for(message.role, ui);
    let name = message.role.name();
    if !color {
        return format!("{} {}:", avatar, name);
    }

    let name = match message.role {
        Role::User => name.blue().bold(),
        Role::Proxy => name.yellow().bold(),
        Role::GraphAgent | Role::TextAgent => name.green().bold(),
        Role::Assistant => name.cyan().bold(),
    };
    format!("{} {}:", avatar, name)
}

/// Print a history to a terminal-like writer. Older messages are written at once;
/// the newest one is written word by word at the pacer's speed.
pub async fn write_history<W, P>(
    out: &mut W,
    history: &[ChatMessage],
    ui: &UIConfig,
    pacer: &P,
    color: bool,
) -> io::Result<()>
where
    W: Write,
    P: Pacer + ?Sized,
{
    for entry in visible_entries(history) {
        writeln!(out, "{}", label(entry.message, ui, color))?;
        let text = display_text(entry.message);

        if entry.streamed {
            for word in WordStream::new(&text) {
                write!(out, "{}", word)?;
                out.flush()?;
                pacer.pause().await;
            }
            writeln!(out)?;
        } else {
            writeln!(out, "{}", text)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Markdown transcript of a history, blank messages left out
pub fn to_markdown(history: &[ChatMessage], ui: &UIConfig) -> String {
    visible_entries(history)
        .iter()
        .map(|entry| {
            format!(
                "**{} {}**\n\n{}\n",
                avatar_for(entry.message.role, ui),
                entry.message.role.name(),
                display_text(entry.message)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NoDelay;

    #[tokio::test]
    async fn test_write_history_skips_blank_and_streams_last() {
        let ui = UIConfig::default();
        let history = vec![
            ChatMessage::new(Role::User, "Who leads Sales?"),
            ChatMessage::new(Role::Proxy, ""),
            ChatMessage::new(Role::GraphAgent, "Dana  leads\nSales."),
        ];

        let mut out = Vec::new();
        write_history(&mut out, &history, &ui, &NoDelay, false).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("👩‍💼 user:\nWho leads Sales?\n"));
        assert!(!text.contains("user_proxy"));
        // Streamed text is re-spaced word by word
        assert!(text.contains("👩‍💼 GraphRAG_Agent:\nDana leads Sales. \n"));
    }

    #[test]
    fn test_markdown_transcript() {
        let ui = UIConfig::default();
        let history = vec![
            ChatMessage::new(Role::Proxy, "Guide me"),
            ChatMessage::new(Role::Assistant, "Start on the home page."),
        ];
        let md = to_markdown(&history, &ui);
        assert!(md.starts_with("**🧠 user_proxy**\n\n*System prompted:* Guide me\n"));
        assert!(md.contains("Start on the home page."));
    }
}
