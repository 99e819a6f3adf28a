//! Individual WebSocket connection
//!
//! The relay never touches the WebSocket directly. Everything it wants to
//! write goes through a bounded queue drained by a single sender task, which
//! keeps binary frames from the pump and close frames from the dispatcher in
//! one ordered stream.

use crate::protocol::CloseCode;
use relay_core::ConnectionId;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tokio::sync::mpsc;

/// A frame queued for the WebSocket sender task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Raw relayed bytes
    Binary(Vec<u8>),
    /// Close the WebSocket with this code; nothing is sent after it
    Close(CloseCode),
}

/// Why a connection went away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Client sent a close frame or the stream ended
    ClientClosed,
    /// The transport reported an error (treated as an unclean close)
    TransportError(String),
    /// The relay closed the connection itself
    RelayClosed(CloseCode),
}

impl std::fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientClosed => write!(f, "client closed"),
            Self::TransportError(e) => write!(f, "transport error: {e}"),
            Self::RelayClosed(code) => write!(f, "relay closed: {code}"),
        }
    }
}

/// Returned when a frame is queued on a connection that is closing or gone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("WebSocket connection is closed")]
pub struct ConnectionClosed;

/// A single WebSocket connection
pub struct Connection {
    /// Lookup key for the session registry
    id: ConnectionId,

    /// Remote address of the browser, when the listener exposes it
    peer_addr: Option<SocketAddr>,

    /// Channel to the WebSocket sender task
    sender: mpsc::Sender<OutboundFrame>,

    /// Set once a close frame has been queued
    close_code: OnceLock<CloseCode>,
}

impl Connection {
    /// Create a new connection
    pub fn new(
        id: ConnectionId,
        peer_addr: Option<SocketAddr>,
        sender: mpsc::Sender<OutboundFrame>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            peer_addr,
            sender,
            close_code: OnceLock::new(),
        })
    }

    /// Get the connection id
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Peer address for log output
    pub fn peer_label(&self) -> String {
        self.peer_addr
            .map_or_else(|| "unknown".to_string(), |addr| addr.to_string())
    }

    /// Queue one binary frame
    pub async fn send_binary(&self, data: Vec<u8>) -> Result<(), ConnectionClosed> {
        self.send(OutboundFrame::Binary(data)).await
    }

    async fn send(&self, frame: OutboundFrame) -> Result<(), ConnectionClosed> {
        if self.close_code.get().is_some() {
            return Err(ConnectionClosed);
        }
        self.sender.send(frame).await.map_err(|_| ConnectionClosed)
    }

    /// Queue a close frame.
    ///
    /// Only the first call has an effect; returns whether this call queued it.
    pub async fn close(&self, code: CloseCode) -> bool {
        if self.close_code.set(code).is_err() {
            return false;
        }

        tracing::debug!(
            connection_id = %self.id,
            close_code = %code,
            "Closing WebSocket connection"
        );

        self.sender.send(OutboundFrame::Close(code)).await.is_ok()
    }

    /// Whether frames can still be queued
    pub fn is_open(&self) -> bool {
        self.close_code.get().is_none() && !self.sender.is_closed()
    }

    /// Close code queued by the relay, if any
    pub fn close_code(&self) -> Option<CloseCode> {
        self.close_code.get().copied()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .field("close_code", &self.close_code.get())
            .finish()
    }
}
