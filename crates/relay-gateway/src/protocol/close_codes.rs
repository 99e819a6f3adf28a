//! WebSocket close codes
//!
//! Defines relay-specific close codes. They are the only error signal a client
//! ever receives; no structured error payload is sent over the control channel.

/// Relay WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CloseCode {
    /// TCP peer closed its side of the connection
    RemoteClosed = 1000,
    /// Unknown error occurred
    UnknownError = 4000,
    /// Invalid control message encoding (strict mode only)
    DecodeError = 4002,
    /// Could not connect to the requested TCP peer
    ConnectFailed = 4010,
    /// Reading from the TCP peer failed
    RemoteReadFailed = 4011,
    /// Writing to the TCP peer failed
    RemoteWriteFailed = 4012,
}

impl CloseCode {
    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::RemoteClosed => "Remote closed the connection",
            Self::UnknownError => "Unknown error occurred",
            Self::DecodeError => "Invalid control message",
            Self::ConnectFailed => "Could not connect to remote",
            Self::RemoteReadFailed => "Reading from remote failed",
            Self::RemoteWriteFailed => "Writing to remote failed",
        }
    }

    /// Get the name of this close code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RemoteClosed => "RemoteClosed",
            Self::UnknownError => "UnknownError",
            Self::DecodeError => "DecodeError",
            Self::ConnectFailed => "ConnectFailed",
            Self::RemoteReadFailed => "RemoteReadFailed",
            Self::RemoteWriteFailed => "RemoteWriteFailed",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}
