use crate::agents::{ChatMessage, Role};
use crate::app::UIConfig;

/// Avatar shown next to a speaker
pub fn avatar_for(role: Role, ui: &UIConfig) -> &str {
    match role {
        Role::Proxy => &ui.proxy_avatar,
        Role::User | Role::GraphAgent | Role::TextAgent => &ui.person_avatar,
        Role::Assistant => &ui.default_avatar,
    }
}

/// Text of a message as it appears in the timeline
pub fn display_text(message: &ChatMessage) -> String {
    let content = message.content.trim();
    match message.role {
        Role::Proxy => format!("*System prompted:* {}", content),
        _ => content.to_string(),
    }
}

/// A message that will be rendered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleEntry<'a> {
    pub index: usize,
    pub message: &'a ChatMessage,
    /// Only the newest message of a history is streamed
    pub streamed: bool,
}

/// Messages to render, skipping blank ones. Blank messages stay in the history.
pub fn visible_entries(history: &[ChatMessage]) -> Vec<VisibleEntry<'_>> {
    let last = history.len().saturating_sub(1);
    history
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.is_blank())
        .map(|(index, message)| VisibleEntry {
            index,
            message,
            streamed: index == last,
        })
        .collect()
}
