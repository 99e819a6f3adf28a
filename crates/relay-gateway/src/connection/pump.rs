//! TCP to WebSocket pump
//!
//! One task per session. Each successful read becomes exactly one binary
//! frame: no coalescing, no splitting below the read chunk.

use super::RelaySession;
use crate::protocol::CloseCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::watch;

/// Why the pump stopped
#[derive(Debug)]
enum PumpExit {
    /// Remote sent EOF
    Eof,
    /// Reading from the remote failed
    ReadError(std::io::Error),
    /// The WebSocket side is gone
    WebSocketClosed,
    /// Teardown was requested elsewhere
    Cancelled,
}

pub(super) async fn run(
    session: Arc<RelaySession>,
    mut reader: OwnedReadHalf,
    mut shutdown: watch::Receiver<bool>,
    buffer_size: usize,
) {
    let connection_id = session.connection().id();
    let mut buf = vec![0u8; buffer_size];
    let mut relayed: u64 = 0;

    let exit = loop {
        let read = tokio::select! {
            biased;
            _ = shutdown.changed() => break PumpExit::Cancelled,
            read = reader.read(&mut buf) => read,
        };

        let n = match read {
            Ok(0) => break PumpExit::Eof,
            Ok(n) => n,
            Err(e) => break PumpExit::ReadError(e),
        };

        let sent = tokio::select! {
            biased;
            _ = shutdown.changed() => break PumpExit::Cancelled,
            sent = session.connection().send_binary(buf[..n].to_vec()) => sent,
        };
        if sent.is_err() {
            break PumpExit::WebSocketClosed;
        }
        relayed += n as u64;
    };

    tracing::debug!(
        connection_id = %connection_id,
        bytes = relayed,
        exit = ?exit,
        "Pump stopped"
    );

    match exit {
        PumpExit::Eof => session.fail(CloseCode::RemoteClosed).await,
        PumpExit::ReadError(e) => {
            tracing::warn!(
                connection_id = %connection_id,
                remote = %session.endpoint(),
                error = %e,
                "Read from remote failed"
            );
            session.fail(CloseCode::RemoteReadFailed).await;
        }
        PumpExit::WebSocketClosed => {
            session.teardown().await;
        }
        PumpExit::Cancelled => {}
    }
}
