//! # relay-gateway
//!
//! WebSocket endpoint that bridges each browser connection to one TCP peer.
//!
//! Text frames carry JSON control envelopes (`Open`, `JoinIdentity`); binary
//! frames carry the raw byte stream, relayed verbatim in both directions.

pub mod connection;
pub mod handlers;
pub mod identity;
pub mod protocol;
pub mod server;

pub use server::{
    create_app, create_gateway_state, create_router, run, run_server, serve, GatewayState,
};
