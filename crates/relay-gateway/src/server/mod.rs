//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::relay_handler;
pub use state::GatewayState;

use crate::connection::SessionRegistry;
use crate::identity::SessionServerClient;
use axum::{routing::get, Router};
use relay_common::{AppError, RelayConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/", get(relay_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub fn create_gateway_state(config: RelayConfig) -> Result<GatewayState, AppError> {
    let identity = SessionServerClient::new(&config.identity)
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    tracing::info!(
        join_url = %identity.join_url(),
        timeout_secs = config.identity.request_timeout_secs,
        "Identity client ready"
    );

    Ok(GatewayState::new(
        SessionRegistry::new_shared(),
        Arc::new(identity),
        config,
    ))
}

/// Serve `app` on an already bound listener until Ctrl-C
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(AppError::internal)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    tracing::info!("Starting relay gateway on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Relay listening on ws://{}/", addr);

    serve(listener, app).await
}

/// Run the complete gateway server with configuration
pub async fn run(config: RelayConfig) -> Result<(), AppError> {
    let addr = config.gateway.address();

    let state = create_gateway_state(config)?;
    let app = create_app(state.clone());

    let result = run_server(app, &addr).await;

    // Open WebSockets may outlive the listener; release their TCP peers
    state.registry().teardown_all().await;

    result
}
