//! Identity provider clients

mod session_server;

pub use session_server::SessionServerClient;
