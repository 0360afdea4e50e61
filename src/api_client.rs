//! Chat proxy client
//!
//! HTTP client the GUI uses to reach the relay's `POST /api/chat` endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body for the chat proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// System-role prompt
    pub role: String,
    /// User message
    pub message: String,
}

/// Both the success body and the proxy's error body carry a `message`
#[derive(Debug, Deserialize)]
struct ChatReply {
    message: String,
}

/// Errors that can occur while calling the chat proxy
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request never produced an HTTP response (connection refused, DNS, ...)
    #[error("Failed to reach chat proxy: {0}")]
    Transport(#[from] reqwest::Error),

    /// The proxy answered with a non-2xx status
    #[error(
        "Chat proxy returned status {status}: {}",
        .message.as_deref().unwrap_or("no message")
    )]
    Status {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, if it had one
        message: Option<String>,
    },

    /// A 2xx body without a usable `message` field
    #[error("Invalid reply from chat proxy: {0}")]
    InvalidBody(String),
}

/// Client for the chat proxy
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// Create a client for the proxy at `base_url`
    /// Clones share one connection pool
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Full URL of the chat endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    /// Send one chat request and return the assistant's reply text
    ///
    /// # Arguments
    /// * `token` - Session token sent as `Authorization: Bearer <token>`
    /// * `request` - Role prompt and user message
    ///
    /// # Errors
    /// * `ChatError::Transport` if no response was received
    /// * `ChatError::Status` for any non-2xx status
    /// * `ChatError::InvalidBody` if a 2xx body has no `message` string
    pub async fn send(&self, token: Option<&str>, request: &ChatRequest) -> Result<String, ChatError> {
        let url = self.endpoint();
        tracing::debug!(
            url = %url,
            has_token = token.is_some(),
            message_len = request.message.len(),
            "Sending chat request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.unwrap_or_default())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ChatReply>(&body)
                .ok()
                .map(|reply| reply.message);
            return Err(ChatError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatReply =
            serde_json::from_str(&body).map_err(|e| ChatError::InvalidBody(e.to_string()))?;

        tracing::debug!(reply_len = reply.message.len(), "Chat reply received");
        Ok(reply.message)
    }
}
