// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod factory;
mod traits;
mod types;
mod unified;

// Public re-exports - the ONLY way to access model functionality
pub use factory::ModelFactory;
#[cfg(test)]
pub use traits::MockModel;
pub use traits::Model;
pub use types::{ApiMessage, ApiRole, ModelConfig, ModelResponse, TokenUsage};
pub use unified::{base_url_for, UnifiedModel};
