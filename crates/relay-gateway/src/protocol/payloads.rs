//! Client payload definitions
//!
//! Defines the payload structures for client-to-relay control messages.

use serde::Deserialize;

/// Payload for packet 0 (Open)
///
/// Names the TCP peer this connection should be bridged to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenPayload {
    /// Host name or address of the TCP peer
    pub host: String,

    /// Port of the TCP peer; range-checked when the endpoint is built
    pub port: i64,
}

/// Payload for packet 1 (Join Identity)
///
/// Carries a bearer credential from the browser. The browser cannot call the
/// identity provider itself (cross-origin), so the relay has to hold the token
/// for the duration of one join call. It is never logged or stored.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinIdentityPayload {
    /// Bearer token issued to the player by the identity provider
    pub access_token: String,

    /// Profile id, usually 32 hex characters without dashes
    pub selected_profile: String,

    /// Server hash the game server expects the player to join
    pub server_id: String,
}

impl std::fmt::Debug for JoinIdentityPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoinIdentityPayload")
            .field("access_token", &"<redacted>")
            .field("selected_profile", &self.selected_profile)
            .field("server_id", &self.server_id)
            .finish()
    }
}
