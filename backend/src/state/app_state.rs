// Application state
// Holds the relay built from the configuration

use crate::config::Config;
use crate::relay::Relay;
use std::sync::Arc;

/// State shared by all request handlers
pub type SharedState = Arc<AppState>;

/// Application state
/// Read-only after startup, so handlers share it without locking
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay to the upstream chat service
    pub relay: Relay,
}

impl AppState {
    /// Build state from configuration, creating the shared HTTP client
    pub fn new(config: Config) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Build state from configuration with a caller-provided HTTP client
    pub fn with_client(config: Config, client: reqwest::Client) -> Self {
        Self {
            relay: Relay::new(client, config.upstream.invoke_url),
        }
    }

    /// Wrap the state for sharing across handlers
    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, UpstreamConfig};

    #[test]
    fn test_relay_uses_configured_invoke_url() {
        let config = Config {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
            },
            upstream: UpstreamConfig {
                invoke_url: "http://upstream.test/chat".to_string(),
            },
        };
        let state = AppState::new(config);
        assert_eq!(state.relay.invoke_url(), "http://upstream.test/chat");
    }
}
