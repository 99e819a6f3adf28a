//! Test fixtures
//!
//! Control message builders and a recording identity provider.

use async_trait::async_trait;
use parking_lot::Mutex;
use relay_core::{GameProfile, IdentityError, IdentityResult, IdentityService};
use serde_json::json;

/// Undashed profile id used by the join tests
pub const PROFILE_SIMPLE: &str = "0123456789abcdef0123456789abcdef";

/// Same profile id in hyphenated form
pub const PROFILE_HYPHENATED: &str = "01234567-89ab-cdef-0123-456789abcdef";

/// Build an Open (packet 0) control message
pub fn open_message(host: &str, port: u16) -> String {
    json!({ "id": 0, "payload": { "host": host, "port": port } }).to_string()
}

/// Build a Join Identity (packet 1) control message
pub fn join_message(access_token: &str, selected_profile: &str, server_id: &str) -> String {
    json!({
        "id": 1,
        "payload": {
            "accessToken": access_token,
            "selectedProfile": selected_profile,
            "serverId": server_id,
        }
    })
    .to_string()
}

/// One join call seen by [`RecordingIdentityService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedJoin {
    pub profile_id: String,
    pub profile_name: String,
    pub access_token: String,
    pub server_id: String,
}

/// Identity provider that records every join and answers from a fixed script
#[derive(Debug, Default)]
pub struct RecordingIdentityService {
    joins: Mutex<Vec<RecordedJoin>>,
    reject: bool,
}

impl RecordingIdentityService {
    /// Provider that accepts every join
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Provider that rejects every join with 403
    pub fn rejecting() -> Self {
        Self {
            joins: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    /// Joins recorded so far
    pub fn joins(&self) -> Vec<RecordedJoin> {
        self.joins.lock().clone()
    }
}

#[async_trait]
impl IdentityService for RecordingIdentityService {
    async fn join_server(
        &self,
        profile: &GameProfile,
        access_token: &str,
        server_id: &str,
    ) -> IdentityResult<()> {
        self.joins.lock().push(RecordedJoin {
            profile_id: profile.id.to_string(),
            profile_name: profile.name.clone(),
            access_token: access_token.to_string(),
            server_id: server_id.to_string(),
        });

        if self.reject {
            return Err(IdentityError::Rejected {
                status: 403,
                message: "Invalid token".to_string(),
            });
        }
        Ok(())
    }
}
