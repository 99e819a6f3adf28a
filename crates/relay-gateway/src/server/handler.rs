//! WebSocket handler
//!
//! Handles WebSocket connections and frame processing.

use crate::connection::{Connection, DisconnectReason, OutboundFrame};
use crate::handlers::MessageDispatcher;
use crate::protocol::CloseCode;
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        ConnectInfo, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use relay_core::ConnectionId;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long a relay-initiated close frame may take to go out
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// WebSocket relay handler
pub async fn relay_handler(
    State(state): State<GatewayState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let peer_addr = connect_info.map(|ConnectInfo(addr)| addr);
    ws.on_upgrade(move |socket| handle_socket(state, socket, peer_addr))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket, peer_addr: Option<SocketAddr>) {
    let connection_id = ConnectionId::generate();

    // Outgoing frames from the pump and the dispatcher
    let (tx, mut rx) = mpsc::channel::<OutboundFrame>(state.config().relay.outbound_buffer);
    let connection = Connection::new(connection_id, peer_addr, tx);

    MessageDispatcher::on_connection_opened(&connection);

    let (mut ws_sink, mut ws_stream) = socket.split();

    let state_recv = state.clone();
    let connection_recv = connection.clone();

    // Frames are handled one at a time, so per-connection ordering holds
    let mut recv_task = tokio::spawn(async move {
        // A frame read while a forward was stalled, handled next
        let mut pending: Option<Result<Message, axum::Error>> = None;

        loop {
            let msg = match pending.take() {
                Some(msg) => msg,
                None => match ws_stream.next().await {
                    Some(msg) => msg,
                    None => return DisconnectReason::ClientClosed,
                },
            };

            match msg {
                Ok(Message::Text(text)) => {
                    if let Some(close_code) =
                        MessageDispatcher::on_text_message(&state_recv, &connection_recv, &text)
                            .await
                    {
                        connection_recv.close(close_code).await;
                        return DisconnectReason::RelayClosed(close_code);
                    }
                }
                Ok(Message::Binary(data)) => {
                    let forward =
                        MessageDispatcher::on_binary_message(&state_recv, &connection_recv, &data);
                    tokio::pin!(forward);

                    // Keep watching the client while the remote applies backpressure
                    tokio::select! {
                        biased;
                        () = &mut forward => {}
                        next = ws_stream.next() => match next {
                            None | Some(Ok(Message::Close(_))) => {
                                return DisconnectReason::ClientClosed;
                            }
                            Some(Err(e)) => return DisconnectReason::TransportError(e.to_string()),
                            Some(msg) => {
                                pending = Some(msg);
                                forward.await;
                            }
                        },
                    }
                }
                Ok(Message::Ping(_)) => {
                    tracing::trace!(connection_id = %connection_id, "Ping received");
                    // Pong is handled automatically by axum
                }
                Ok(Message::Pong(_)) => {
                    tracing::trace!(connection_id = %connection_id, "Pong received");
                }
                Ok(Message::Close(_)) => {
                    return DisconnectReason::ClientClosed;
                }
                Err(e) => {
                    return DisconnectReason::TransportError(e.to_string());
                }
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let (message, last) = match frame {
                OutboundFrame::Binary(data) => (Message::Binary(data), false),
                OutboundFrame::Close(code) => (
                    Message::Close(Some(CloseFrame {
                        code: code.as_u16(),
                        reason: code.description().into(),
                    })),
                    true,
                ),
            };

            if ws_sink.send(message).await.is_err() {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Failed to send frame to WebSocket"
                );
                return;
            }
            if last {
                break;
            }
        }

        let _ = ws_sink.close().await;
    });

    // Wait for either side to finish
    let reason = tokio::select! {
        result = &mut recv_task => {
            let reason = match result {
                Ok(reason) => reason,
                Err(e) => {
                    tracing::error!(
                        connection_id = %connection_id,
                        error = %e,
                        "Receive task failed"
                    );
                    connection.close(CloseCode::UnknownError).await;
                    DisconnectReason::RelayClosed(CloseCode::UnknownError)
                }
            };
            if matches!(reason, DisconnectReason::RelayClosed(_)) {
                // Let the queued close frame reach the client
                if tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task).await.is_err() {
                    send_task.abort();
                }
            } else {
                send_task.abort();
            }
            reason
        }
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
            recv_task.abort();
            connection.close_code().map_or_else(
                || DisconnectReason::TransportError("outbound stream ended".to_string()),
                DisconnectReason::RelayClosed,
            )
        }
    };

    MessageDispatcher::on_connection_closed(&state, connection_id, &reason).await;
}
