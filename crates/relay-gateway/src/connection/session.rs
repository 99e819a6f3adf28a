//! Relay session
//!
//! Bridges one WebSocket connection to one TCP connection. The session owns
//! the TCP write half directly; the read half belongs to the pump task.

use super::pump;
use super::Connection;
use crate::protocol::{CloseCode, JoinIdentityPayload};
use parking_lot::Mutex;
use relay_common::RelaySettings;
use relay_core::{DomainError, GameProfile, IdentityError, IdentityService, ProfileId, RemoteEndpoint};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Relay session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// The TCP peer could not be reached
    #[error("Failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: RemoteEndpoint,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the TCP peer failed; the session has been torn down
    #[error("Failed to write to remote: {0}")]
    Write(#[source] std::io::Error),

    /// The session was already torn down
    #[error("Session is closed")]
    Closed,

    /// The JoinIdentity payload carried an unusable profile id
    #[error(transparent)]
    InvalidProfile(#[from] DomainError),

    /// The identity provider refused or could not be reached
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// A live bridge between one WebSocket connection and one TCP peer
pub struct RelaySession {
    /// Owning WebSocket connection
    connection: Arc<Connection>,

    /// TCP peer, fixed for the lifetime of the session
    endpoint: RemoteEndpoint,

    /// TCP write half; `None` once torn down
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,

    /// Flipped to `true` to stop the pump
    shutdown: watch::Sender<bool>,

    /// TCP to WebSocket pump
    pump: Mutex<Option<JoinHandle<()>>>,

    /// Set by the first teardown
    torn_down: AtomicBool,

    /// Session creation time
    opened_at: Instant,
}

impl RelaySession {
    /// Connect to `endpoint` and start the pump.
    ///
    /// Uses the platform's default connect timeout. On failure nothing is
    /// started; closing the WebSocket is up to the caller.
    pub async fn create(
        connection: Arc<Connection>,
        endpoint: RemoteEndpoint,
        settings: &RelaySettings,
    ) -> Result<Arc<Self>, SessionError> {
        let stream = TcpStream::connect((endpoint.host(), endpoint.port()))
            .await
            .map_err(|source| SessionError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "Failed to set TCP_NODELAY");
        }

        let (reader, writer) = stream.into_split();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let session = Arc::new(Self {
            connection,
            endpoint,
            writer: tokio::sync::Mutex::new(Some(writer)),
            shutdown: shutdown_tx,
            pump: Mutex::new(None),
            torn_down: AtomicBool::new(false),
            opened_at: Instant::now(),
        });

        let handle = tokio::spawn(pump::run(
            Arc::clone(&session),
            reader,
            shutdown_rx,
            settings.read_buffer_size,
        ));
        *session.pump.lock() = Some(handle);

        tracing::info!(
            connection_id = %session.connection.id(),
            peer = %session.connection.peer_label(),
            remote = %session.endpoint,
            "Relay session opened"
        );

        Ok(session)
    }

    /// Get the owning connection
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Get the TCP peer
    pub fn endpoint(&self) -> &RemoteEndpoint {
        &self.endpoint
    }

    /// Whether teardown has run
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Whether the pump task is still alive
    pub fn is_pump_running(&self) -> bool {
        self.pump
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Write `data` verbatim to the TCP peer.
    ///
    /// Callers deliver frames for one connection sequentially, so ordering is
    /// preserved without extra serialization. A failed write tears the session
    /// down and closes the WebSocket.
    ///
    /// A write blocked on a peer that stopped reading is abandoned as soon as
    /// teardown starts.
    pub async fn forward_to_remote(&self, data: &[u8]) -> Result<(), SessionError> {
        let mut shutdown = self.shutdown.subscribe();

        let result = {
            let mut guard = self.writer.lock().await;
            let Some(writer) = guard.as_mut() else {
                return Err(SessionError::Closed);
            };

            tokio::select! {
                biased;
                _ = shutdown.wait_for(|stop| *stop) => return Err(SessionError::Closed),
                result = writer.write_all(data) => result,
            }
        };

        if let Err(e) = result {
            tracing::warn!(
                connection_id = %self.connection.id(),
                remote = %self.endpoint,
                error = %e,
                "Write to remote failed"
            );
            self.fail(CloseCode::RemoteWriteFailed).await;
            return Err(SessionError::Write(e));
        }

        tracing::trace!(
            connection_id = %self.connection.id(),
            bytes = data.len(),
            "Forwarded to remote"
        );

        Ok(())
    }

    /// Confirm the player's identity to the identity provider.
    ///
    /// A single, unretried call. The outcome never changes session state.
    pub async fn handle_join(
        &self,
        identity: &dyn IdentityService,
        payload: &JoinIdentityPayload,
    ) -> Result<GameProfile, SessionError> {
        let profile_id = ProfileId::parse(&payload.selected_profile)?;
        let profile = GameProfile::placeholder(profile_id);

        identity
            .join_server(&profile, &payload.access_token, &payload.server_id)
            .await?;

        Ok(profile)
    }

    /// Close the TCP channel and stop the pump.
    ///
    /// Idempotent and safe to race from the dispatcher and the pump; returns
    /// `true` only for the call that actually tore the session down.
    pub async fn teardown(&self) -> bool {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            return false;
        }

        // Stops the pump and any in-flight write, even after the pump exited
        self.shutdown.send_replace(true);

        let writer = self.writer.lock().await.take();
        if let Some(mut writer) = writer {
            if let Err(e) = writer.shutdown().await {
                tracing::trace!(error = %e, "Remote already closed");
            }
        }

        tracing::info!(
            connection_id = %self.connection.id(),
            peer = %self.connection.peer_label(),
            remote = %self.endpoint,
            duration_ms = self.opened_at.elapsed().as_millis(),
            "Relay session closed"
        );

        true
    }

    /// Tear down and close the WebSocket with `code`
    pub(super) async fn fail(&self, code: CloseCode) {
        if self.teardown().await {
            self.connection.close(code).await;
        }
    }
}

impl std::fmt::Debug for RelaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySession")
            .field("connection", &self.connection.id())
            .field("endpoint", &self.endpoint)
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}
