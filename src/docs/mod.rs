// Gateway module for documents - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod diagram;
mod store;

// Public re-exports - the ONLY way to access document functionality
pub use diagram::{extract_mermaid_blocks, fence_block};
pub use store::{Category, DocumentCollection, DocumentStore};
