//! WebSocket error types

use crate::transport::TransportError;
use decagon_types::{ErrorKind, FrameError};
use thiserror::Error;

/// Errors raised by the WebSocket side of the SDK
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WsError {
    /// Bad socket URL or similar setup problem
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Send attempted while the connection is not open
    #[error("WebSocket is not connected")]
    NotConnected,

    /// Inbound frame could not be decoded
    #[error("protocol error: {0}")]
    Protocol(#[from] FrameError),

    /// Socket level failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl WsError {
    /// Map onto the shared error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Transport(e) => e.kind(),
        }
    }

    /// Returns true if reconnecting may help
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

/// Result type for WebSocket operations
pub type WsResult<T> = Result<T, WsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(WsError::NotConnected.kind(), ErrorKind::NotConnected);
        assert_eq!(
            WsError::Configuration("bad url".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            WsError::from(FrameError::MissingType).kind(),
            ErrorKind::Protocol
        );
        assert_eq!(
            WsError::from(TransportError::ConnectionClosed).kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn test_retryable() {
        assert!(WsError::Transport(TransportError::ReceiveFailed("reset".into())).is_retryable());
        assert!(!WsError::NotConnected.is_retryable());
    }
}
