//! Connection identity - opaque handle for one client WebSocket connection

use std::fmt;
use uuid::Uuid;

/// Opaque, stable identifier of one WebSocket connection for its whole lifetime.
///
/// Only ever used as a lookup key; the inner value carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh, random connection id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
