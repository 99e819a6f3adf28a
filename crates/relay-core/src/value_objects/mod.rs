//! Value objects - immutable types that represent domain concepts

mod connection_id;
mod profile;
mod remote_endpoint;

pub use connection_id::ConnectionId;
pub use profile::{GameProfile, ProfileId};
pub use remote_endpoint::RemoteEndpoint;
