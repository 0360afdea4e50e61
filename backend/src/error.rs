//! Error types and error handling for the relay
//!
//! Every failure the relay can produce is a [`RelayError`]. Each variant maps to
//! an HTTP response via `IntoResponse`; upstream failures are collapsed into a
//! generic message so that backend error detail never reaches the caller.

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Body message returned for every upstream failure
pub const GENERIC_ERROR_MESSAGE: &str = "An internal error occurred. Please try again later.";

/// Body message returned when the incoming request body is not JSON
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body.";

/// Relay-level error types
#[derive(Error, Debug)]
pub enum RelayError {
    /// Only POST is accepted on the chat endpoint
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Method),

    /// Incoming body could not be parsed as JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// Upstream call failed, either with an error status or at the transport level
    #[error("Upstream request failed (status: {status:?}): {detail}")]
    Upstream {
        /// Status reported by the upstream, if a response was received
        status: Option<StatusCode>,
        /// Diagnostic detail, logged server-side only
        detail: String,
    },
}

impl RelayError {
    /// Status code the caller will see for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status, .. } => {
                status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            RelayError::MethodNotAllowed(_) => (
                status,
                [(header::ALLOW, "POST")],
                "Method Not Allowed",
            )
                .into_response(),
            RelayError::InvalidBody(_) => {
                (status, Json(json!({ "message": INVALID_BODY_MESSAGE }))).into_response()
            }
            RelayError::Upstream { .. } => {
                (status, Json(json!({ "message": GENERIC_ERROR_MESSAGE }))).into_response()
            }
        }
    }
}
