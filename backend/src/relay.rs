//! Proxy relay
//!
//! Forwards chat requests to the configured upstream chat service and relays
//! the response back. The relay holds no mutable state; every call is
//! independent and the shared `reqwest::Client` only provides connection pooling.

use crate::error::RelayError;
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

/// Successful relay outcome: status and the upstream JSON body, verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    /// Status returned to the caller (always 200 for a relayed success)
    pub status: StatusCode,
    /// Upstream body
    pub body: Value,
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Pass-through relay to the upstream chat service
#[derive(Debug, Clone)]
pub struct Relay {
    client: reqwest::Client,
    invoke_url: String,
}

impl Relay {
    /// Create a relay forwarding to `invoke_url` through a shared client
    pub fn new(client: reqwest::Client, invoke_url: impl Into<String>) -> Self {
        Self {
            client,
            invoke_url: invoke_url.into(),
        }
    }

    /// Upstream URL this relay forwards to
    pub fn invoke_url(&self) -> &str {
        &self.invoke_url
    }

    /// Relay a single chat request
    ///
    /// # Arguments
    /// * `method` - HTTP method of the incoming request (only POST is accepted)
    /// * `body` - Raw incoming body, expected to be JSON
    /// * `auth_header` - Incoming `Authorization` header, forwarded as-is
    ///
    /// # Errors
    /// * `RelayError::MethodNotAllowed` for anything but POST
    /// * `RelayError::InvalidBody` if the body is not JSON
    /// * `RelayError::Upstream` if the upstream call fails or returns a non-2xx status
    pub async fn relay(
        &self,
        method: &Method,
        body: &[u8],
        auth_header: Option<&str>,
    ) -> Result<RelayResponse, RelayError> {
        if method != Method::POST {
            tracing::debug!(method = %method, "Rejecting non-POST chat request");
            return Err(RelayError::MethodNotAllowed(method.clone()));
        }

        let payload: Value = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, body_len = body.len(), "Rejecting chat request with invalid JSON body");
                return Err(RelayError::InvalidBody(e));
            }
        };

        let result = self.forward(&payload, auth_header.unwrap_or("")).await;
        if let Err(err) = &result {
            // The detail stays in the log; the caller only sees the generic message.
            tracing::error!(
                status = err.status_code().as_u16(),
                error = %err,
                "Error proxying to chat backend"
            );
        }
        result
    }

    async fn forward(&self, payload: &Value, auth_header: &str) -> Result<RelayResponse, RelayError> {
        tracing::debug!(
            url = %self.invoke_url,
            has_auth = !auth_header.is_empty(),
            "Forwarding chat request upstream"
        );

        let response = self
            .client
            .post(&self.invoke_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::AUTHORIZATION, auth_header)
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| RelayError::Upstream {
                status: None,
                detail: format!("Failed to send HTTP request to chat backend: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(RelayError::Upstream {
                status: StatusCode::from_u16(status_code).ok(),
                detail: format!(
                    "Chat backend returned error status {}: {}",
                    status_code, error_body
                ),
            });
        }

        let text = response.text().await.map_err(|e| RelayError::Upstream {
            status: None,
            detail: format!("Failed to read response body from chat backend: {}", e),
        })?;

        // A non-JSON success body is passed on as a JSON string.
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        tracing::debug!(upstream_status = status.as_u16(), "Relayed chat response");

        Ok(RelayResponse {
            status: StatusCode::OK,
            body,
        })
    }
}
