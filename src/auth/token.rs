//! JWT claim decoding
//!
//! Only the payload segment is read; the signature is the identity provider's
//! and the backend's business.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Claims the client cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch (fractional values are truncated)
    #[serde(default, deserialize_with = "deserialize_exp")]
    pub exp: Option<i64>,
    /// Subject (stable user id)
    pub sub: Option<String>,
    /// User pool user name
    #[serde(rename = "cognito:username")]
    pub username: Option<String>,
}

fn deserialize_exp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let exp = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(exp.and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|secs| secs.trunc() as i64))))
}

impl TokenClaims {
    /// Id to tag the user's messages with
    pub fn user_id(&self) -> Option<String> {
        self.username.clone().or_else(|| self.sub.clone())
    }

    /// Expiry as a timestamp
    pub fn expiry(&self) -> Result<DateTime<Utc>, TokenError> {
        self.exp
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
            .ok_or(TokenError::MissingExpiry)
    }
}

/// Reasons a token's claims cannot be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not three dot-separated segments
    #[error("Token is not a JWT")]
    Malformed,

    /// Payload segment is not base64url
    #[error("Token payload is not valid base64url: {0}")]
    Encoding(String),

    /// Payload is not a JSON claims object
    #[error("Token payload is not valid JSON: {0}")]
    Payload(String),

    /// No usable `exp` claim
    #[error("Token expiration not found")]
    MissingExpiry,
}

/// Result of checking a token against the clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// Expiry is in the future (or exactly now)
    Valid(TokenClaims),
    /// Expiry has passed
    Expired,
    /// Expiry could not be determined
    Undecodable(TokenError),
}

/// Decode the payload claims of a JWT
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let &[_, payload, _] = segments.as_slice() else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Encoding(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::Payload(e.to_string()))
}

/// Check a token against `now`
pub fn check_token(token: &str, now: DateTime<Utc>) -> TokenStatus {
    let claims = match decode_claims(token) {
        Ok(claims) => claims,
        Err(e) => return TokenStatus::Undecodable(e),
    };
    let expiry = match claims.expiry() {
        Ok(expiry) => expiry,
        Err(e) => return TokenStatus::Undecodable(e),
    };

    if now > expiry {
        TokenStatus::Expired
    } else {
        TokenStatus::Valid(claims)
    }
}
