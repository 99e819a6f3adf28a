//! Remote endpoint - the TCP peer a relay session is bound to

use crate::error::DomainError;
use std::fmt;

/// Host and port of the TCP peer.
///
/// Fixed when the session is created; a session is never re-pointed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteEndpoint {
    host: String,
    port: u16,
}

impl RemoteEndpoint {
    /// Create an endpoint, rejecting blank hosts
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, DomainError> {
        let host = host.into();
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidHost(host));
        }

        Ok(Self {
            host: trimmed.to_string(),
            port,
        })
    }

    /// Create an endpoint from an unchecked integer port (as decoded from JSON)
    pub fn from_raw(host: impl Into<String>, port: i64) -> Result<Self, DomainError> {
        let port = u16::try_from(port).map_err(|_| DomainError::InvalidPort(port))?;
        Self::new(host, port)
    }

    /// Get the host name or address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the port
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // IPv6 literals need brackets to stay unambiguous
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
