//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid profile id: {0}")]
    InvalidProfileId(String),

    #[error("Invalid remote host: {0:?}")]
    InvalidHost(String),

    #[error("Invalid remote port: {0}")]
    InvalidPort(i64),
}
