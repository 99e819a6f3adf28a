//! Relay protocol definitions
//!
//! Defines the control envelope, packet ids, payloads, and close codes.

mod close_codes;
mod envelope;
mod packet_ids;
mod payloads;

pub use close_codes::CloseCode;
pub use envelope::{ControlEnvelope, ControlMessage, ProtocolError};
pub use packet_ids::PacketId;
pub use payloads::{JoinIdentityPayload, OpenPayload};
