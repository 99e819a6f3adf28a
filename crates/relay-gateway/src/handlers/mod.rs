//! Frame handlers
//!
//! Routes decoded control messages to their packet handlers and relays binary
//! frames to the connection's session.

mod error;
mod join;
mod open;

pub use error::{HandlerError, HandlerResult};
pub use join::JoinHandler;
pub use open::OpenHandler;

use crate::connection::{Connection, DisconnectReason, SessionError};
use crate::protocol::{CloseCode, ControlMessage};
use crate::server::GatewayState;
use relay_core::ConnectionId;
use std::sync::Arc;

/// Dispatch incoming client frames to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// A WebSocket connection was accepted. No session exists yet.
    pub fn on_connection_opened(connection: &Arc<Connection>) {
        tracing::info!(
            connection_id = %connection.id(),
            peer = %connection.peer_label(),
            "WebSocket connection established"
        );
    }

    /// Handle a text frame.
    ///
    /// Returns the close code when the connection should be closed.
    pub async fn on_text_message(
        state: &GatewayState,
        connection: &Arc<Connection>,
        text: &str,
    ) -> Option<CloseCode> {
        let message = match ControlMessage::decode(text) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection.id(),
                    error = %e,
                    "Dropping malformed control message"
                );
                return state
                    .config()
                    .relay
                    .close_on_malformed
                    .then_some(CloseCode::DecodeError);
            }
        };

        tracing::trace!(
            connection_id = %connection.id(),
            id = %message.packet_id(),
            "Received control message"
        );

        match Self::dispatch(state, connection, message).await {
            Ok(close_code) => close_code,
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection.id(),
                    error = %e,
                    "Handler error"
                );
                e.to_close_code()
            }
        }
    }

    /// Handle a decoded control message
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: ControlMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        match message {
            ControlMessage::Open(endpoint) => OpenHandler::handle(state, connection, endpoint).await,
            ControlMessage::JoinIdentity(payload) => {
                JoinHandler::handle(state, connection, payload).await
            }
        }
    }

    /// Handle a binary frame: relay it verbatim to the TCP peer.
    ///
    /// Frames that arrive before Open are dropped.
    pub async fn on_binary_message(state: &GatewayState, connection: &Arc<Connection>, data: &[u8]) {
        let Some(session) = state.registry().get(&connection.id()) else {
            tracing::debug!(
                connection_id = %connection.id(),
                bytes = data.len(),
                "Dropping binary frame sent before Open"
            );
            return;
        };

        match session.forward_to_remote(data).await {
            Ok(()) => {}
            // The session has already closed the WebSocket
            Err(SessionError::Write(_)) => {}
            Err(e) => {
                tracing::debug!(
                    connection_id = %connection.id(),
                    error = %e,
                    "Dropping binary frame"
                );
            }
        }
    }

    /// The WebSocket is gone: unregister and tear down its session, if any
    pub async fn on_connection_closed(
        state: &GatewayState,
        id: ConnectionId,
        reason: &DisconnectReason,
    ) {
        match reason {
            DisconnectReason::TransportError(_) => {
                tracing::warn!(connection_id = %id, reason = %reason, "WebSocket connection lost");
            }
            _ => {
                tracing::info!(connection_id = %id, reason = %reason, "WebSocket connection closed");
            }
        }

        if let Some(session) = state.registry().remove(&id) {
            session.teardown().await;
        }
    }
}
