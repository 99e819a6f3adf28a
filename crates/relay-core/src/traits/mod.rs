//! Ports implemented by the infrastructure layer

mod identity;

pub use identity::{IdentityError, IdentityResult, IdentityService};
