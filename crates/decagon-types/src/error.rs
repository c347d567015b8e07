//! Error taxonomy shared by the Decagon SDK crates

use std::fmt;

/// Category of an SDK error
///
/// Every crate-level error type maps onto one of these so callers can decide
/// how to react without matching on crate-specific variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument was missing or empty (caller bug)
    InvalidInput,
    /// The client is misconfigured (e.g. empty shared secret)
    Configuration,
    /// A frame was sent while the WebSocket was not open
    NotConnected,
    /// An inbound frame could not be decoded
    Protocol,
    /// Network or socket level failure
    Transport,
    /// The service answered with a non-success status
    Api,
    /// A response body could not be decoded
    Decode,
}

impl ErrorKind {
    /// Returns the kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Configuration => "configuration",
            Self::NotConnected => "not_connected",
            Self::Protocol => "protocol",
            Self::Transport => "transport",
            Self::Api => "api",
            Self::Decode => "decode",
        }
    }

    /// Returns true if retrying the same call may succeed
    ///
    /// The SDK itself never retries; this is advice for the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport)
    }

    /// Returns true if the error is a caller or configuration bug
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidInput | Self::Configuration)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced when a WebSocket frame cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Frame is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Frame is JSON but not an object
    #[error("frame is not a JSON object")]
    NotAnObject,

    /// Frame has no string `type` field
    #[error("frame has no `type` field")]
    MissingType,

    /// Binary frame that is not valid UTF-8
    #[error("frame is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

impl FrameError {
    /// Frame errors are always protocol errors
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Protocol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::Transport.is_retryable());
        assert!(!ErrorKind::InvalidInput.is_retryable());
        assert!(!ErrorKind::NotConnected.is_retryable());
        assert!(!ErrorKind::Protocol.is_retryable());
    }

    #[test]
    fn test_fatal_kinds() {
        assert!(ErrorKind::Configuration.is_fatal());
        assert!(ErrorKind::InvalidInput.is_fatal());
        assert!(!ErrorKind::Api.is_fatal());
    }

    #[test]
    fn test_frame_error_display() {
        let err = FrameError::MissingType;
        assert!(err.to_string().contains("type"));
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }
}
