//! Open handler (packet 0)

use super::HandlerResult;
use crate::connection::{Connection, RelaySession};
use crate::protocol::CloseCode;
use crate::server::GatewayState;
use relay_core::RemoteEndpoint;
use std::sync::Arc;

/// Handles Open messages
pub struct OpenHandler;

impl OpenHandler {
    /// Bind the connection to a TCP peer.
    ///
    /// The first Open wins: a later Open on the same connection is ignored and
    /// never re-points the session.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        endpoint: RemoteEndpoint,
    ) -> HandlerResult<Option<CloseCode>> {
        if state.registry().has_session(&connection.id()) {
            tracing::debug!(
                connection_id = %connection.id(),
                remote = %endpoint,
                "Ignoring Open for connection that already has a session"
            );
            return Ok(None);
        }

        let session =
            RelaySession::create(Arc::clone(connection), endpoint, &state.config().relay).await?;

        if let Err(rejected) = state.registry().try_insert(session) {
            tracing::debug!(
                connection_id = %connection.id(),
                "Concurrent Open lost the race, discarding its session"
            );
            rejected.teardown().await;
        }

        Ok(None)
    }
}
