// Gateway module for agents - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod agent;
mod factory;
mod proxy;
mod types;

// Public re-exports - the ONLY way to access agent functionality
pub use agent::ConversableAgent;
pub use factory::AgentFactory;
pub use proxy::{TerminationPredicate, UserProxy};
pub use types::{ChatMessage, ChatOptions, ChatResult, Role, SummaryMethod};
