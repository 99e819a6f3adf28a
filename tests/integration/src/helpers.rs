//! Test helpers for integration tests
//!
//! Provides a relay server bound to an ephemeral port, a WebSocket client and
//! a plain TCP peer for the relay to dial.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use relay_common::RelayConfig;
use relay_gateway::connection::SessionRegistry;
use relay_gateway::{create_app, serve, GatewayState};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::fixtures::RecordingIdentityService;

/// Upper bound for any single wait in a test
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: GatewayState,
    pub identity: Arc<RecordingIdentityService>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with default settings
    pub async fn start() -> Result<Self> {
        Self::start_with(test_config()?, RecordingIdentityService::accepting()).await
    }

    /// Start a test server with custom config and identity provider
    pub async fn start_with(config: RelayConfig, identity: RecordingIdentityService) -> Result<Self> {
        let identity = Arc::new(identity);
        let state = GatewayState::new(
            SessionRegistry::new_shared(),
            Arc::clone(&identity) as Arc<dyn relay_core::IdentityService>,
            config,
        );
        let app = create_app(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            identity,
            _handle: handle,
        })
    }

    /// Get the WebSocket URL of the relay
    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    /// Get base URL for plain HTTP requests
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of live relay sessions
    pub fn session_count(&self) -> usize {
        self.state.registry().session_count()
    }

    /// Wait until the registry holds `expected` sessions
    pub async fn wait_for_sessions(&self, expected: usize) -> Result<()> {
        wait_until(|| self.session_count() == expected)
            .await
            .with_context(|| {
                format!(
                    "expected {expected} sessions, found {}",
                    self.session_count()
                )
            })
    }
}

/// Create a test configuration from defaults only
pub fn test_config() -> Result<RelayConfig> {
    RelayConfig::from_lookup(|_| None).map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Poll `condition` until it holds or the test timeout passes
pub async fn wait_until<F>(mut condition: F) -> Result<()>
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(TEST_TIMEOUT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .context("condition not met in time")
}

/// TCP peer the relay connects to
pub struct TcpPeer {
    listener: TcpListener,
}

impl TcpPeer {
    /// Bind to an ephemeral local port
    pub async fn bind() -> Result<Self> {
        Ok(Self {
            listener: TcpListener::bind("127.0.0.1:0").await?,
        })
    }

    /// Port the peer listens on
    pub fn port(&self) -> u16 {
        self.listener.local_addr().map_or(0, |addr| addr.port())
    }

    /// Accept the relay's connection
    pub async fn accept(&self) -> Result<TcpStream> {
        let (stream, _) = tokio::time::timeout(TEST_TIMEOUT, self.listener.accept())
            .await
            .context("relay never connected")??;
        Ok(stream)
    }

    /// Assert that nothing connects within `window`
    pub async fn expect_no_connection(&self, window: Duration) -> Result<()> {
        match tokio::time::timeout(window, self.listener.accept()).await {
            Ok(Ok((_, addr))) => bail!("unexpected connection from {addr}"),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Ok(()),
        }
    }
}

/// A port nothing listens on
pub async fn unused_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    Ok(listener.local_addr()?.port())
}

/// WebSocket client speaking to the relay
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Connect to the relay
    pub async fn connect(server: &TestServer) -> Result<Self> {
        let (stream, _) = connect_async(server.ws_url()).await?;
        Ok(Self { stream })
    }

    /// Send a text (control) frame
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Send a binary frame
    pub async fn send_binary(&mut self, data: impl Into<Vec<u8>>) -> Result<()> {
        self.stream.send(Message::Binary(data.into())).await?;
        Ok(())
    }

    /// Start a close handshake from the client side
    pub async fn close(&mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }

    /// Next frame, skipping pings and pongs
    async fn next_frame(&mut self) -> Result<Option<Message>> {
        loop {
            let next = tokio::time::timeout(TEST_TIMEOUT, self.stream.next())
                .await
                .context("no frame received in time")?;
            match next {
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(msg)) => return Ok(Some(msg)),
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(None),
            }
        }
    }

    /// Collect binary frames until `len` bytes have arrived
    pub async fn read_binary(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut received = Vec::with_capacity(len);
        while received.len() < len {
            match self.next_frame().await? {
                Some(Message::Binary(data)) => received.extend_from_slice(&data),
                Some(other) => bail!("expected binary frame, got {other:?}"),
                None => bail!("stream ended after {} bytes", received.len()),
            }
        }
        Ok(received)
    }

    /// Read until the relay closes the connection; returns the close code
    pub async fn expect_close(&mut self) -> Result<u16> {
        loop {
            match self.next_frame().await? {
                Some(Message::Close(Some(frame))) => return Ok(u16::from(frame.code)),
                Some(Message::Close(None)) => return Ok(u16::from(CloseCode::Status)),
                Some(Message::Binary(_)) => {}
                Some(other) => bail!("expected close frame, got {other:?}"),
                None => bail!("stream ended without a close frame"),
            }
        }
    }

    /// Assert that no frame arrives within `window`
    pub async fn expect_silence(&mut self, window: Duration) -> Result<()> {
        match tokio::time::timeout(window, self.stream.next()).await {
            Err(_) => Ok(()),
            Ok(frame) => bail!("unexpected frame: {frame:?}"),
        }
    }
}
