use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::DIAGRAM_LANGUAGE;

// Non-greedy body between an opening ```mermaid line and the next closing fence
static MERMAID_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```mermaid[ \t]*\r?\n(.*?)```").expect("mermaid block pattern is valid")
});

/// Bodies of every fenced mermaid diagram in `markdown`, trimmed, in source order.
/// An unterminated fence yields nothing.
pub fn extract_mermaid_blocks(markdown: &str) -> Vec<String> {
    MERMAID_BLOCK
        .captures_iter(markdown)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str().trim().to_string())
        .collect()
}

/// Wrap a diagram body back into a fenced block
pub fn fence_block(body: &str) -> String {
    format!("```{}\n{}\n```", DIAGRAM_LANGUAGE, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_blocks_in_order() {
        let md = "# Org\n```mermaid\ngraph TD; A-->B\n```\ntext\n```mermaid\ngraph LR\n  C-->D\n```\n";
        assert_eq!(
            extract_mermaid_blocks(md),
            vec!["graph TD; A-->B".to_string(), "graph LR\n  C-->D".to_string()]
        );
    }

    #[test]
    fn test_ignores_other_fences_and_unterminated_blocks() {
        let md = "```rust\nfn main() {}\n```\n```mermaid\ngraph TD; X-->Y\n";
        assert!(extract_mermaid_blocks(md).is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent_on_bodies() {
        let md = "```mermaid\ngraph TD; A-->B\n```";
        let blocks = extract_mermaid_blocks(md);
        assert_eq!(blocks.len(), 1);
        assert!(extract_mermaid_blocks(&blocks[0]).is_empty());
    }

    #[test]
    fn test_fence_block_round_trips() {
        let fenced = fence_block("graph TD; A-->B");
        assert_eq!(extract_mermaid_blocks(&fenced), vec!["graph TD; A-->B".to_string()]);
    }

    #[test]
    fn test_crlf_documents() {
        let md = "```mermaid\r\ngraph TD; A-->B\r\n```\r\n";
        assert_eq!(extract_mermaid_blocks(md), vec!["graph TD; A-->B".to_string()]);
    }
}
