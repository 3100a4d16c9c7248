// Gateway module for presentation helpers - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod avatar;
mod plain;
mod stream;

// Public re-exports - the ONLY way to access rendering functionality
pub use avatar::{avatar_for, display_text, visible_entries, VisibleEntry};
pub use plain::{to_markdown, write_history};
pub use stream::{stream_words, FixedDelay, NoDelay, Pacer, WordStream};
