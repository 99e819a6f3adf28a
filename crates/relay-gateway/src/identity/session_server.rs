//! Session server client
//!
//! Performs the `join` call of the game's session service over HTTPS on
//! behalf of a browser client.

use async_trait::async_trait;
use relay_common::IdentityConfig;
use relay_core::{GameProfile, IdentityError, IdentityResult, IdentityService};
use serde::Serialize;

/// Join request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequest<'a> {
    access_token: &'a str,
    /// Undashed profile UUID
    selected_profile: String,
    server_id: &'a str,
}

/// HTTP client for the session server's join endpoint
#[derive(Debug, Clone)]
pub struct SessionServerClient {
    http: reqwest::Client,
    join_url: String,
}

impl SessionServerClient {
    /// Path of the join endpoint, relative to the session server base URL
    pub const JOIN_PATH: &'static str = "/session/minecraft/join";

    /// Build a client from configuration
    pub fn new(config: &IdentityConfig) -> IdentityResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        Ok(Self::with_client(http, &config.session_server_url))
    }

    /// Build a client around an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            join_url: format!("{}{}", base_url.trim_end_matches('/'), Self::JOIN_PATH),
        }
    }

    /// Get the full join URL
    pub fn join_url(&self) -> &str {
        &self.join_url
    }
}

#[async_trait]
impl IdentityService for SessionServerClient {
    async fn join_server(
        &self,
        profile: &GameProfile,
        access_token: &str,
        server_id: &str,
    ) -> IdentityResult<()> {
        let body = JoinRequest {
            access_token,
            selected_profile: profile.id.simple(),
            server_id,
        };

        let response = self
            .http
            .post(&self.join_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                profile = %profile.id,
                status = status.as_u16(),
                "Session server accepted join"
            );
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(IdentityError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
