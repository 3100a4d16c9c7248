use tracing::debug;

use crate::agents::ChatMessage;

/// Drop every message that echoes injected reference material.
///
/// Matching is a case-insensitive substring test against `markers`, so a reply
/// that merely quotes one of the markers is dropped as well.
pub fn sanitize(history: Vec<ChatMessage>, markers: &[String]) -> Vec<ChatMessage> {
    let markers: Vec<String> = markers
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| m.to_lowercase())
        .collect();

    history
        .into_iter()
        .filter(|msg| {
            let content = msg.content.to_lowercase();
            let leaked = markers.iter().any(|marker| content.contains(marker.as_str()));
            if leaked {
                debug!(role = %msg.role, "Hiding message that echoes reference material");
            }
            !leaked
        })
        .collect()
}
