//! Player profile identity
//!
//! Browser clients send the selected profile as a bare 32-character hex string.
//! It is normalized into canonical 8-4-4-4-12 form before it reaches the identity provider.

use crate::error::DomainError;
use std::fmt;
use uuid::Uuid;

/// Canonical profile identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(Uuid);

impl ProfileId {
    /// Parse a profile id from its undashed (32 hex) or hyphenated (36 chars) form
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let well_formed = match trimmed.len() {
            32 => trimmed.bytes().all(|b| b.is_ascii_hexdigit()),
            36 => true,
            _ => false,
        };
        if !well_formed {
            return Err(DomainError::InvalidProfileId(raw.to_string()));
        }

        Uuid::try_parse(trimmed)
            .map(Self)
            .map_err(|_| DomainError::InvalidProfileId(raw.to_string()))
    }

    /// Undashed lowercase form, as the session server expects it on the wire
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for ProfileId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Profile handed to the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProfile {
    pub id: ProfileId,
    pub name: String,
}

impl GameProfile {
    /// Display name used when the client never tells us the real one
    pub const PLACEHOLDER_NAME: &'static str = "Unknown";

    /// Create a profile with an explicit name
    #[must_use]
    pub fn new(id: ProfileId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Create a profile carrying the placeholder display name
    #[must_use]
    pub fn placeholder(id: ProfileId) -> Self {
        Self::new(id, Self::PLACEHOLDER_NAME)
    }
}
