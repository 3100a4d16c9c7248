// Gateway module for prompt routing - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod assembler;
mod classifier;
mod manager;
mod sanitizer;
mod stall;

// Public re-exports - the ONLY way to access routing functionality
pub use assembler::{assemble, org_prompt, personal_prompt, Route};
pub use classifier::is_org_related;
pub use manager::{ChatManager, ChatResponse};
pub use sanitizer::sanitize;
pub use stall::should_stop;
