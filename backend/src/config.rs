//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

/// Default upstream chat service, used when `API_INVOKE_URL` is unset
pub const DEFAULT_INVOKE_URL: &str = "http://localhost:3001/chat";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream chat backend configuration
    pub upstream: UpstreamConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Upstream chat backend configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// URL every chat request is forwarded to (opaque, not validated)
    pub invoke_url: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            upstream: UpstreamConfig {
                invoke_url: env::var("API_INVOKE_URL")
                    .unwrap_or_else(|_| DEFAULT_INVOKE_URL.to_string()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("PORT");
        env::remove_var("HOST");
        env::remove_var("API_INVOKE_URL");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.upstream.invoke_url, DEFAULT_INVOKE_URL);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("PORT", "9090");
        env::set_var("HOST", "127.0.0.1");
        env::set_var("API_INVOKE_URL", "https://example.execute-api.test/prod/chat");

        let config = Config::from_env();
        assert_eq!(config.server_addr(), "127.0.0.1:9090");
        assert_eq!(
            config.upstream.invoke_url,
            "https://example.execute-api.test/prod/chat"
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        assert_eq!(Config::from_env().server.port, 8080);
        clear_env();
    }
}
