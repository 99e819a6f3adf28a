//! Connection management
//!
//! WebSocket connections, the relay sessions bound to them, and the registry
//! that maps one to the other.

mod connection;
mod pump;
mod registry;
mod session;

pub use connection::{Connection, ConnectionClosed, DisconnectReason, OutboundFrame};
pub use registry::SessionRegistry;
pub use session::{RelaySession, SessionError};
