//! Control envelope format
//!
//! Every text frame is `{"id": <packet id>, "payload": {...}}`. Envelopes are
//! decoded completely before anything acts on them, so a bad field never leaves
//! a half-applied message behind.

use super::{JoinIdentityPayload, OpenPayload, PacketId};
use relay_core::{DomainError, RemoteEndpoint};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Raw control envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ControlEnvelope {
    /// Packet id
    pub id: PacketId,

    /// Packet-specific payload object
    pub payload: Value,
}

/// A fully decoded and validated control message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    /// Connect to the given TCP peer
    Open(RemoteEndpoint),
    /// Confirm the player's identity to the identity provider
    JoinIdentity(JoinIdentityPayload),
}

/// Errors raised while decoding a control message
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Not JSON, not an envelope, or an unknown packet id
    #[error("Malformed envelope: {0}")]
    Decode(#[from] serde_json::Error),

    /// Envelope was fine but the payload did not match its packet id
    #[error("Invalid {id} payload: {reason}")]
    InvalidPayload { id: PacketId, reason: String },

    /// Payload fields were present but out of range
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ControlEnvelope {
    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate the payload against the packet id
    pub fn into_message(self) -> Result<ControlMessage, ProtocolError> {
        let invalid = |id: PacketId, err: serde_json::Error| ProtocolError::InvalidPayload {
            id,
            reason: err.to_string(),
        };

        match self.id {
            PacketId::Open => {
                let payload: OpenPayload =
                    serde_json::from_value(self.payload).map_err(|e| invalid(PacketId::Open, e))?;
                let endpoint = RemoteEndpoint::from_raw(payload.host, payload.port)?;
                Ok(ControlMessage::Open(endpoint))
            }
            PacketId::JoinIdentity => serde_json::from_value(self.payload)
                .map(ControlMessage::JoinIdentity)
                .map_err(|e| invalid(PacketId::JoinIdentity, e)),
        }
    }
}

impl ControlMessage {
    /// Decode a text frame into a validated control message
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        ControlEnvelope::from_json(raw)?.into_message()
    }

    /// Packet id this message was sent with
    #[must_use]
    pub const fn packet_id(&self) -> PacketId {
        match self {
            Self::Open(_) => PacketId::Open,
            Self::JoinIdentity(_) => PacketId::JoinIdentity,
        }
    }
}

impl std::fmt::Display for ControlEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ControlEnvelope(id={})", self.id)
    }
}
