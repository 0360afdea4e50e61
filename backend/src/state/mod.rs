// State management module
// Handles the shared, read-only relay state

pub mod app_state;

pub use app_state::{AppState, SharedState};
