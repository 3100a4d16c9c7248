/// Session management module - Gateway

mod state;

pub use state::{Page, SessionState};
