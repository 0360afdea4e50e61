//! Chat proxy endpoint
//!
//! `/api/chat` is routed for every method so that the relay, not the router,
//! decides what a non-POST request gets back (405 with `Allow: POST`). The
//! body (`{ role, message }` from the client) is forwarded without reshaping.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method},
};

use crate::error::RelayError;
use crate::relay::RelayResponse;
use crate::state::SharedState;

/// ANY /api/chat - Relay a chat request to the upstream service
pub async fn relay_chat(
    State(state): State<SharedState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<RelayResponse, RelayError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    state.relay.relay(&method, &body, auth_header).await
}
