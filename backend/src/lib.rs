//! Relay Chat Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod relay;
/// Application state management
///
/// Holds the relay and its configuration, shared read-only by handlers.
pub mod state;
