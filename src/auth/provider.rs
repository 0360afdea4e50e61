//! Identity provider seam and session initialization

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::auth::token::{check_token, TokenStatus};

/// Errors reported by an identity provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No signed-in user
    #[error("No current session")]
    NoSession,

    /// The provider call itself failed
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// A usable session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Id token sent as the bearer credential
    pub token: String,
    /// User id decoded from the token, if it carried one
    pub user_id: Option<String>,
}

/// Outcome of session initialization, handed to the UI to present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Token fetched and not expired
    Authenticated(Session),
    /// Token was expired; the provider was asked to sign out
    SignedOut,
    /// The provider could not produce a session
    Unauthenticated(SessionError),
}

/// External identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Id token of the current session
    async fn current_session(&self) -> Result<String, SessionError>;

    /// Invalidate the current session
    async fn sign_out(&self) -> Result<(), SessionError>;
}

/// Provider backed by a token handed in through configuration
///
/// Stands in for the hosted sign-in flow; signing out forgets the token.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    token: RwLock<Option<String>>,
}

impl StaticTokenProvider {
    /// Create a provider holding `token` (or no session at all)
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.trim().is_empty())),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn current_session(&self) -> Result<String, SessionError> {
        self.token.read().await.clone().ok_or(SessionError::NoSession)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Fetch the current session and check its expiry
///
/// An expired token triggers `sign_out` before anything else happens. A token
/// whose expiry cannot be decoded is kept; the backend gets the final say.
pub async fn initialize_session(
    provider: &dyn IdentityProvider,
    now: DateTime<Utc>,
) -> SessionOutcome {
    let token = match provider.current_session().await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "Error getting JWT token");
            return SessionOutcome::Unauthenticated(e);
        }
    };

    match check_token(&token, now) {
        TokenStatus::Valid(claims) => SessionOutcome::Authenticated(Session {
            user_id: claims.user_id(),
            token,
        }),
        TokenStatus::Expired => {
            tracing::info!("Token is expired. Signing out...");
            if let Err(e) = provider.sign_out().await {
                tracing::warn!(error = %e, "Sign-out after token expiry failed");
            }
            SessionOutcome::SignedOut
        }
        TokenStatus::Undecodable(e) => {
            tracing::warn!(error = %e, "Error decoding token, using it as-is");
            SessionOutcome::Authenticated(Session {
                token,
                user_id: None,
            })
        }
    }
}
