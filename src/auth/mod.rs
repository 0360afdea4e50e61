// Authentication module
// Identity provider seam, session initialization and JWT claim decoding

pub mod provider;
pub mod token;

pub use provider::{
    initialize_session, IdentityProvider, Session, SessionError, SessionOutcome,
    StaticTokenProvider,
};
