//! Relay Gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p relay-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use relay_common::{try_init_tracing, AppResult, RelayConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, error_code = e.error_code(), "Relay gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    info!("Starting WebSocket relay gateway...");

    // Load configuration
    let config = RelayConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        address = %config.gateway.address(),
        "Configuration loaded"
    );

    relay_gateway::run(config).await?;

    info!("Relay gateway stopped");
    Ok(())
}
