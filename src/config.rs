// Client configuration
// Loaded once at startup from environment variables with defaults

use std::env;

/// Default proxy location (the relay backend's default bind address)
pub const DEFAULT_PROXY_BASE_URL: &str = "http://127.0.0.1:8080";

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the chat proxy (`/api/chat` is appended)
    pub proxy_base_url: String,
    /// Identity provider settings
    pub identity: IdentityConfig,
    /// Id token for the static identity provider
    pub id_token: Option<String>,
}

/// Identity provider settings
///
/// Opaque strings handed to the provider; nothing here validates them.
#[allow(dead_code)] // Consumed by the hosted sign-in flow, only logged here
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Identity pool id
    pub identity_pool_id: String,
    /// Region of the pools
    pub region: String,
    /// User pool id
    pub user_pool_id: String,
    /// App client id
    pub app_client_id: String,
}

fn var_or_empty(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            proxy_base_url: env::var("PROXY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PROXY_BASE_URL.to_string()),
            identity: IdentityConfig {
                identity_pool_id: var_or_empty("COGNITO_IDENTITY_POOL_ID"),
                region: var_or_empty("AWS_REGION"),
                user_pool_id: var_or_empty("COGNITO_USER_POOL_ID"),
                app_client_id: var_or_empty("COGNITO_APP_CLIENT_ID"),
            },
            id_token: env::var("CHAT_ID_TOKEN").ok(),
        }
    }
}

// The id token never goes to the log.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("proxy_base_url", &self.proxy_base_url)
            .field("identity", &self.identity)
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 6] = [
        "PROXY_BASE_URL",
        "COGNITO_IDENTITY_POOL_ID",
        "AWS_REGION",
        "COGNITO_USER_POOL_ID",
        "COGNITO_APP_CLIENT_ID",
        "CHAT_ID_TOKEN",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ClientConfig::from_env();
        assert_eq!(config.proxy_base_url, DEFAULT_PROXY_BASE_URL);
        assert_eq!(config.identity, IdentityConfig::default());
        assert!(config.id_token.is_none());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("PROXY_BASE_URL", "http://chat.internal:9000");
        env::set_var("AWS_REGION", "ap-northeast-1");
        env::set_var("COGNITO_USER_POOL_ID", "ap-northeast-1_abc");
        env::set_var("CHAT_ID_TOKEN", "secret.jwt.value");

        let config = ClientConfig::from_env();
        assert_eq!(config.proxy_base_url, "http://chat.internal:9000");
        assert_eq!(config.identity.region, "ap-northeast-1");
        assert_eq!(config.identity.user_pool_id, "ap-northeast-1_abc");
        assert_eq!(config.id_token.as_deref(), Some("secret.jwt.value"));
        assert!(!format!("{:?}", config).contains("secret"));
        clear_env();
    }
}
