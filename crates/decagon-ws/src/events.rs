//! Connection events
//!
//! The driver task is the only producer; the caller holds the single
//! [`EventReceiver`]. Events for one connection arrive in order and end with
//! exactly one [`Event::Closed`].

use crate::transport::TransportError;
use decagon_types::{FrameError, WsMessage};
use tokio::sync::mpsc;

/// Receiving end of a connection's event channel
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Why a connection reached `Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// `close()` was called, or a new connect replaced this connection
    ClientRequested,
    /// The server closed the socket
    ServerClosed,
    /// The socket failed
    TransportError,
}

/// Something that happened on a connection
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Handshake completed; the connection is `Open`
    Opened,
    /// A decoded inbound frame
    Message(WsMessage),
    /// An inbound frame that could not be decoded; the connection stays open
    ProtocolError {
        /// What was wrong with it
        error: FrameError,
        /// The frame text, empty if it was not valid UTF-8
        raw: String,
    },
    /// The socket failed; a `Closed` event follows
    TransportError(TransportError),
    /// The connection is `Closed`; no further events follow
    Closed(CloseReason),
}

impl Event {
    /// Returns true for the final event of a connection
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }

    /// The decoded message, if this is one
    pub fn as_message(&self) -> Option<&WsMessage> {
        match self {
            Self::Message(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<WsMessage> for Event {
    fn from(msg: WsMessage) -> Self {
        Self::Message(msg)
    }
}

impl From<TransportError> for Event {
    fn from(error: TransportError) -> Self {
        Self::TransportError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_helpers() {
        let event = Event::from(WsMessage::message("conv_1", "hi"));
        assert!(event.as_message().is_some());
        assert!(!event.is_closed());

        assert!(Event::Closed(CloseReason::ServerClosed).is_closed());
        assert!(Event::Opened.as_message().is_none());
    }
}
