//! Error types for credential derivation

use decagon_types::ErrorKind;

/// Errors that can occur while deriving credentials
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// A required argument was missing or empty
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The generator cannot sign (missing secret, unusable key)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Map into the shared error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    pub(crate) fn empty(field: &str) -> Self {
        Self::InvalidInput(format!("{} must not be empty", field))
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
