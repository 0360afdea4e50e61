// State management module
// Handles the transcript, session and UI state behind a reducer

pub mod app_state;
pub mod message;

pub use app_state::{Action, AppState, AuthStatus, Command, RequestId};
pub use message::{Message, Sender};
