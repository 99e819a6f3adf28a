//! # relay-core
//!
//! Domain layer containing value objects, the identity provider port, and domain errors.
//! This crate has zero dependencies on infrastructure (sockets, web framework, HTTP clients).

pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use error::DomainError;
pub use traits::{IdentityError, IdentityResult, IdentityService};
pub use value_objects::{ConnectionId, GameProfile, ProfileId, RemoteEndpoint};
