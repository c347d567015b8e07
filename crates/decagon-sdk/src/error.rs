//! SDK error type

use decagon_auth::AuthError;
use decagon_rest::RestError;
use decagon_types::ErrorKind;
use decagon_ws::WsError;
use thiserror::Error;

/// Any error raised through a [`crate::SessionClient`]
#[derive(Error, Debug)]
pub enum SdkError {
    /// Client construction failed validation
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required argument was empty
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Credential derivation failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// REST call failed
    #[error(transparent)]
    Rest(#[from] RestError),

    /// WebSocket operation failed
    #[error(transparent)]
    Ws(#[from] WsError),
}

impl SdkError {
    /// Map onto the shared error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Auth(e) => e.kind(),
            Self::Rest(e) => e.kind(),
            Self::Ws(e) => e.kind(),
        }
    }

    /// Returns true if retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Rest(e) => e.is_retryable(),
            other => other.kind().is_retryable(),
        }
    }
}

/// Result type for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;
