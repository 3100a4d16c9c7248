use crate::agents::ChatMessage;
use crate::constants::STALL_WINDOW;

/// True when the agent replies among the last few messages are all generic failures.
/// A window with no agent replies is not a stall.
pub fn should_stop(history: &[ChatMessage], phrases: &[String]) -> bool {
    let start = history.len().saturating_sub(STALL_WINDOW);
    let recent: Vec<String> = history[start..]
        .iter()
        .filter(|m| m.role.is_rag_agent())
        .map(|m| m.content.trim().to_lowercase())
        .collect();

    if recent.is_empty() {
        return false;
    }

    let phrases: Vec<String> = phrases.iter().map(|p| p.to_lowercase()).collect();
    recent
        .iter()
        .all(|reply| phrases.iter().any(|phrase| reply.contains(phrase.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Role;
    use crate::app::RoutingConfig;

    fn phrases() -> Vec<String> {
        RoutingConfig::default().termination_phrases
    }

    #[test]
    fn test_repeated_apologies_stall() {
        let history = vec![
            ChatMessage::new(Role::TextAgent, "I am sorry, please clarify"),
            ChatMessage::new(Role::TextAgent, "I am sorry, please clarify"),
            ChatMessage::new(Role::TextAgent, "I am sorry, please clarify"),
        ];
        assert!(should_stop(&history, &phrases()));
    }

    #[test]
    fn test_one_helpful_answer_is_not_a_stall() {
        let history = vec![
            ChatMessage::new(Role::GraphAgent, "I apologize, I need more information"),
            ChatMessage::new(Role::GraphAgent, "Alice reports to Bob."),
        ];
        assert!(!should_stop(&history, &phrases()));
    }

    #[test]
    fn test_only_last_window_counts() {
        let history = vec![
            ChatMessage::new(Role::GraphAgent, "Alice reports to Bob."),
            ChatMessage::new(Role::Proxy, "question"),
            ChatMessage::new(Role::GraphAgent, "Please clarify which team."),
            ChatMessage::new(Role::GraphAgent, "  I'M UNABLE TO PROVIDE that.  "),
        ];
        assert!(should_stop(&history, &phrases()));
    }

    #[test]
    fn test_non_agent_messages_are_ignored() {
        let history = vec![
            ChatMessage::new(Role::Proxy, "please clarify"),
            ChatMessage::new(Role::User, "I am sorry"),
        ];
        assert!(!should_stop(&history, &phrases()));
        assert!(!should_stop(&[], &phrases()));
    }
}
