//! Join Identity handler (packet 1)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::{CloseCode, JoinIdentityPayload};
use crate::server::GatewayState;
use std::sync::Arc;

/// Handles Join Identity messages
pub struct JoinHandler;

impl JoinHandler {
    /// Forward the join to the connection's session.
    ///
    /// Runs inline on the connection's event loop, so a slow identity provider
    /// delays this connection's later frames and nothing else. The outcome is
    /// only logged; the client is never told.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: JoinIdentityPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        let Some(session) = state.registry().get(&connection.id()) else {
            tracing::debug!(
                connection_id = %connection.id(),
                "Dropping JoinIdentity sent before Open"
            );
            return Ok(None);
        };

        match session.handle_join(state.identity(), &payload).await {
            Ok(profile) => {
                tracing::info!(
                    connection_id = %connection.id(),
                    profile = %profile.id,
                    server_id = %payload.server_id,
                    "Identity join confirmed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection.id(),
                    server_id = %payload.server_id,
                    error = %e,
                    "Identity join failed"
                );
            }
        }

        Ok(None)
    }
}
