use serde::Serialize;

use crate::agents::Role;
use crate::constants::{ORG_STALL_MESSAGE, PERSONAL_STALL_MESSAGE};
use crate::docs::{extract_mermaid_blocks, fence_block, DocumentCollection};

const ORG_PREAMBLE: &str = "Please answer the user's question based on the following organization \
charts. Only use this information to determine reporting lines, structure, or team relationships. \
Do not include any Mermaid diagrams or raw reference material in your response:";

const PERSONAL_PREAMBLE: &str = "Please use the following personal notes to answer the user's \
question. Do not include any raw personal notes or reference material in your response:";

/// Which agent a prompt is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Organization charts, answered by the graph agent
    Org,
    /// Personal notes, answered by the text agent
    Personal,
}

impl Route {
    pub fn from_classification(is_org_related: bool) -> Self {
        if is_org_related {
            Route::Org
        } else {
            Route::Personal
        }
    }

    /// Agent that answers this route
    pub fn agent_role(&self) -> Role {
        match self {
            Route::Org => Role::GraphAgent,
            Route::Personal => Role::TextAgent,
        }
    }

    /// Synthetic message appended when the agent stalls
    pub fn stall_message(&self) -> &'static str {
        match self {
            Route::Org => ORG_STALL_MESSAGE,
            Route::Personal => PERSONAL_STALL_MESSAGE,
        }
    }
}

/// Build the context-augmented prompt for a route
pub fn assemble(route: Route, docs: &DocumentCollection, question: &str) -> String {
    match route {
        Route::Org => org_prompt(docs, question),
        Route::Personal => personal_prompt(docs, question),
    }
}

/// Every diagram of every org document, re-fenced, followed by the question
pub fn org_prompt(docs: &DocumentCollection, question: &str) -> String {
    let diagrams = docs
        .org
        .values()
        .flat_map(|content| extract_mermaid_blocks(content))
        .map(|block| fence_block(&block))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n\n{}\n\nUser's question: {}", ORG_PREAMBLE, diagrams, question)
}

/// Every personal note under a heading named after its file, followed by the question
pub fn personal_prompt(docs: &DocumentCollection, question: &str) -> String {
    let notes = docs
        .personal
        .iter()
        .map(|(name, content)| format!("# {}\n{}", name, content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n\n{}\n\nUser's question: {}", PERSONAL_PREAMBLE, notes, question)
}
