pub mod agents;
pub mod app;
pub mod cli;
pub mod constants;
pub mod docs;
pub mod models;
pub mod render;
pub mod router;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use models::{Model, ModelFactory};
pub use router::{ChatManager, ChatResponse};
pub use tui::run_ui;
pub use utils::{MentorError, MentorResult};
