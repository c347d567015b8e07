//! Error types for REST API operations

use decagon_auth::AuthError;
use decagon_types::ErrorKind;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential derivation failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A required argument was missing or empty
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the service
        message: String,
    },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl RestError {
    /// Error for a required argument that is empty
    pub fn empty(field: &str) -> Self {
        Self::InvalidInput(format!("{} must not be empty", field))
    }

    /// Map into the shared error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) => ErrorKind::Transport,
            Self::Auth(e) => e.kind(),
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Api { .. } => ErrorKind::Api,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status if the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is retryable
    ///
    /// Transport failures, rate limiting and server errors may succeed on a
    /// later attempt. The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            other => other.kind().is_retryable(),
        }
    }

    /// Check if the service rejected the credential
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(RestError::empty("user_id").kind(), ErrorKind::InvalidInput);
        assert_eq!(
            RestError::from(AuthError::Configuration("no secret".into())).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(RestError::Decode("eof".into()).kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_retryable_statuses() {
        let server = RestError::Api { status: 503, message: "unavailable".into() };
        assert!(server.is_retryable());

        let limited = RestError::Api { status: 429, message: "slow down".into() };
        assert!(limited.is_retryable());

        let bad = RestError::Api { status: 400, message: "bad request".into() };
        assert!(!bad.is_retryable());

        assert!(!RestError::empty("flow_id").is_retryable());
    }

    #[test]
    fn test_auth_error_status() {
        let err = RestError::Api { status: 401, message: "invalid signature".into() };
        assert!(err.is_auth_error());
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("401"));
    }
}
