//! Control packet ids
//!
//! The `id` field of every control envelope.

use serde::{Deserialize, Deserializer};

/// Control packet ids (client to relay only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketId {
    /// Open - connect the session to a TCP peer
    Open = 0,
    /// Join Identity - confirm the player to the identity provider
    JoinIdentity = 1,
}

impl PacketId {
    /// Create a `PacketId` from a raw integer value
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Open),
            1 => Some(Self::JoinIdentity),
            _ => None,
        }
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get the name of this packet id
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::JoinIdentity => "JoinIdentity",
        }
    }
}

impl<'de> Deserialize<'de> for PacketId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown packet id: {value}")))
    }
}

impl std::fmt::Display for PacketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}
