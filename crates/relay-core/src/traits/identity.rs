//! Identity provider port
//!
//! The relay confirms a player's identity to a third-party session service on
//! the browser's behalf, because the browser cannot reach that service itself.
//! The infrastructure layer provides the implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::value_objects::GameProfile;

/// Errors returned by an identity provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The provider answered, but refused the join
    #[error("Identity provider rejected join (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The provider could not be reached or answered garbage
    #[error("Identity provider unreachable: {0}")]
    Transport(String),
}

/// Result type for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Announce that `profile` is joining the server identified by `server_id`.
    ///
    /// One network round trip; callers never retry and never cache the outcome.
    async fn join_server(
        &self,
        profile: &GameProfile,
        access_token: &str,
        server_id: &str,
    ) -> IdentityResult<()>;
}
