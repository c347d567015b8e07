//! Callback adaptor over the event channel
//!
//! For callers who prefer callbacks to polling an [`EventReceiver`].
//! [`Handlers::run`] drains the channel and invokes the matching callback for
//! each event, in order, on one task.
//!
//! # Example
//!
//! ```
//! use decagon_ws::hooks::Handlers;
//!
//! let handlers = Handlers::new(|msg| println!("{} frame", msg.msg_type()))
//!     .on_open(|| println!("connected"))
//!     .on_error(|err| eprintln!("socket error: {}", err))
//!     .on_close(|reason| println!("closed: {:?}", reason));
//! ```

use crate::error::WsError;
use crate::events::{CloseReason, Event, EventReceiver};
use decagon_types::WsMessage;
use std::fmt;
use tracing::{debug, warn};

/// Type aliases for handler callbacks
pub type OpenHandler = Box<dyn FnMut() + Send>;
pub type MessageHandler = Box<dyn FnMut(WsMessage) + Send>;
pub type ErrorHandler = Box<dyn FnMut(WsError) + Send>;
pub type CloseHandler = Box<dyn FnMut(CloseReason) + Send>;

/// Callbacks for one connection
///
/// The message handler is required; the others default to logging.
pub struct Handlers {
    on_open: Option<OpenHandler>,
    on_message: MessageHandler,
    on_error: Option<ErrorHandler>,
    on_close: Option<CloseHandler>,
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("on_open", &self.on_open.as_ref().map(|_| "..."))
            .field("on_message", &"...")
            .field("on_error", &self.on_error.as_ref().map(|_| "..."))
            .field("on_close", &self.on_close.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Handlers {
    /// Create handlers with the required message callback
    pub fn new<F>(on_message: F) -> Self
    where
        F: FnMut(WsMessage) + Send + 'static,
    {
        Self {
            on_open: None,
            on_message: Box::new(on_message),
            on_error: None,
            on_close: None,
        }
    }

    /// Register a callback for the open transition
    pub fn on_open<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Register a callback for errors
    ///
    /// Receives [`WsError::Protocol`] for undecodable frames (the connection
    /// stays open) and [`WsError::Transport`] for socket failures.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnMut(WsError) + Send + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Register a callback for the close transition
    pub fn on_close<F>(mut self, f: F) -> Self
    where
        F: FnMut(CloseReason) + Send + 'static,
    {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Invoke the callback for one event
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Opened => {
                if let Some(hook) = self.on_open.as_mut() {
                    hook();
                }
            }
            Event::Message(msg) => (self.on_message)(msg),
            Event::ProtocolError { error, .. } => self.error(WsError::Protocol(error)),
            Event::TransportError(error) => self.error(WsError::Transport(error)),
            Event::Closed(reason) => match self.on_close.as_mut() {
                Some(hook) => hook(reason),
                None => debug!(?reason, "Connection closed"),
            },
        }
    }

    fn error(&mut self, error: WsError) {
        match self.on_error.as_mut() {
            Some(hook) => hook(error),
            None => warn!("Unhandled WebSocket error: {}", error),
        }
    }

    /// Drive the callbacks until the connection's events end
    pub async fn run(mut self, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            self.dispatch(event);
        }
    }
}
