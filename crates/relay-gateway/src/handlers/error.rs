//! Handler error types

use crate::connection::SessionError;
use crate::protocol::CloseCode;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl HandlerError {
    /// Convert to a close code, if this error should end the connection
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::Session(SessionError::Connect { .. }) => Some(CloseCode::ConnectFailed),
            Self::Session(SessionError::Write(_)) => Some(CloseCode::RemoteWriteFailed),
            Self::Session(
                SessionError::Closed | SessionError::InvalidProfile(_) | SessionError::Identity(_),
            ) => None,
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
