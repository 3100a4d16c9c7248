/// True when the prompt mentions any organization keyword, ignoring case.
/// An empty prompt is never organization-related.
pub fn is_org_related(prompt: &str, keywords: &[String]) -> bool {
    let prompt = prompt.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|keyword| prompt.contains(&keyword.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RoutingConfig;

    fn keywords() -> Vec<String> {
        RoutingConfig::default().org_keywords
    }

    #[test]
    fn test_org_prompts() {
        assert!(is_org_related("Who does the engineering manager report to?", &keywords()));
        assert!(is_org_related("Show me the DEPARTMENT list", &keywords()));
    }

    #[test]
    fn test_personal_prompts() {
        assert!(!is_org_related("What did I note about today's meeting?", &keywords()));
        assert!(!is_org_related("", &keywords()));
    }

    #[test]
    fn test_keywords_match_as_substrings() {
        // "org" is inside "forgot"; matching is plain substring search
        assert!(is_org_related("I forgot my badge", &keywords()));
    }
}
