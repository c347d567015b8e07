//! WebSocket connection management
//!
//! A [`Connection`] owns at most one live socket. Each `open` spawns a driver
//! task that owns the transport: it completes the handshake, decodes inbound
//! frames into [`Event`]s, performs writes requested by [`Connection::send`],
//! and emits a final [`Event::Closed`].
//!
//! ```text
//! Idle --open--> Connecting --handshake--> Open --server close / error / close()--> Closed
//!                    |                                                                ^
//!                    +------------------ failure / close() ---------------------------+
//! ```

use crate::endpoint::SocketUrl;
use crate::error::{WsError, WsResult};
use crate::events::{CloseReason, Event, EventReceiver};
use crate::transport::{Connector, Transport, TransportError, WsConnector, DEFAULT_CONNECT_TIMEOUT};
use decagon_types::{FrameError, WsMessage};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// WebSocket connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Never connected
    #[default]
    Idle,
    /// Handshake in progress
    Connecting,
    /// Connected and ready
    Open,
    /// Closed; a new `open` starts over
    Closed,
}

impl ConnectionState {
    /// Returns the state name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the WebSocket connection
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Socket URL without credentials
    pub socket_url: SocketUrl,
    /// Handshake timeout
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    /// Create a config for a socket URL
    pub fn new(socket_url: SocketUrl) -> Self {
        Self {
            socket_url,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

enum Command {
    Send(String, oneshot::Sender<Result<(), TransportError>>),
    Close,
}

/// Handle on the running driver task
struct ActiveSocket {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

/// WebSocket connection to the conversation service
pub struct Connection {
    config: ConnectionConfig,
    connector: Arc<dyn Connector>,
    state: Arc<RwLock<ConnectionState>>,
    socket: Mutex<Option<ActiveSocket>>,
}

impl Connection {
    /// Create a connection that dials real sockets
    pub fn new(config: ConnectionConfig) -> Self {
        let connector = Arc::new(WsConnector::new(config.connect_timeout));
        Self::with_connector(config, connector)
    }

    /// Create a connection over a custom connector
    pub fn with_connector(config: ConnectionConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            config,
            connector,
            state: Arc::new(RwLock::new(ConnectionState::Idle)),
            socket: Mutex::new(None),
        }
    }

    /// Socket URL without credentials
    pub fn socket_url(&self) -> &SocketUrl {
        &self.config.socket_url
    }

    /// Get the current connection state
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Check if open
    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Start connecting to `url` and return the new connection's events
    ///
    /// A previous connection is closed first and its driver has finished
    /// (including its `Closed` event) before the new socket is created. The
    /// call returns in `Connecting`; [`Event::Opened`] marks the move to `Open`.
    pub async fn open(&self, url: &str) -> WsResult<EventReceiver> {
        let mut slot = self.socket.lock().await;
        if let Some(previous) = slot.take() {
            info!("Closing previous connection before reconnecting");
            shutdown(previous).await;
        }

        let transport = self.connector.transport(url);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        *self.state.write() = ConnectionState::Connecting;
        info!(socket_url = %self.config.socket_url, "Connecting");

        let driver = Driver {
            transport,
            state: self.state.clone(),
            events: event_tx,
            commands: command_rx,
        };
        let task = tokio::spawn(driver.run());

        *slot = Some(ActiveSocket {
            commands: command_tx,
            task,
        });

        Ok(event_rx)
    }

    /// Send a message as one JSON text frame
    ///
    /// Only written while `Open`; otherwise the message is dropped and
    /// [`WsError::NotConnected`] returned. Nothing is queued or retried.
    #[instrument(skip(self, message), fields(msg_type = message.msg_type()))]
    pub async fn send(&self, message: &WsMessage) -> WsResult<()> {
        let state = self.state();
        if state != ConnectionState::Open {
            warn!(%state, "Dropping send: WebSocket is not open");
            return Err(WsError::NotConnected);
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        {
            let slot = self.socket.lock().await;
            let socket = slot.as_ref().ok_or(WsError::NotConnected)?;
            socket
                .commands
                .send(Command::Send(message.to_json(), reply_tx))
                .map_err(|_| WsError::NotConnected)?;
        }

        match reply_rx.await {
            Ok(result) => result.map_err(WsError::from),
            // Driver finished before writing
            Err(_) => {
                warn!("Dropping send: connection closed");
                Err(WsError::NotConnected)
            }
        }
    }

    /// Close the connection
    ///
    /// Waits for the driver to finish. Calling it again, or before any
    /// `open`, does nothing.
    pub async fn close(&self) {
        let previous = self.socket.lock().await.take();
        match previous {
            Some(socket) => {
                shutdown(socket).await;
                info!("Connection closed");
            }
            None => debug!(state = %self.state(), "close() with no live connection"),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("socket_url", &self.config.socket_url.as_str())
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(socket) = self.socket.get_mut().take() {
            let _ = socket.commands.send(Command::Close);
        }
    }
}

/// Ask the driver to close and wait for it to finish
async fn shutdown(socket: ActiveSocket) {
    // Fails only if the driver already ended
    let _ = socket.commands.send(Command::Close);
    if let Err(e) = socket.task.await {
        error!("Connection task ended abnormally: {}", e);
    }
}

/// Owns the transport for one connection
struct Driver {
    transport: Box<dyn Transport>,
    state: Arc<RwLock<ConnectionState>>,
    events: mpsc::UnboundedSender<Event>,
    commands: mpsc::UnboundedReceiver<Command>,
}

enum Handshake {
    Open,
    Failed(TransportError),
    Cancelled,
}

impl Driver {
    async fn run(self) {
        let Driver {
            mut transport,
            state,
            events,
            mut commands,
        } = self;
        let emit = |event: Event| {
            // Receiver dropped means nobody is listening
            let _ = events.send(event);
        };

        let handshake = {
            let mut connect = transport.connect();
            loop {
                tokio::select! {
                    result = &mut connect => break match result {
                        Ok(()) => Handshake::Open,
                        Err(e) => Handshake::Failed(e),
                    },
                    command = commands.recv() => match command {
                        Some(Command::Send(_, reply)) => {
                            let _ = reply.send(Err(TransportError::NotConnected));
                        }
                        Some(Command::Close) | None => break Handshake::Cancelled,
                    },
                }
            }
        };

        match handshake {
            Handshake::Open => {
                *state.write() = ConnectionState::Open;
                info!("WebSocket open");
                emit(Event::Opened);
            }
            Handshake::Failed(e) => {
                error!("WebSocket connect failed: {}", e);
                emit(Event::TransportError(e));
                *state.write() = ConnectionState::Closed;
                emit(Event::Closed(CloseReason::TransportError));
                return;
            }
            Handshake::Cancelled => {
                debug!("Connect cancelled");
                let _ = transport.close().await;
                *state.write() = ConnectionState::Closed;
                emit(Event::Closed(CloseReason::ClientRequested));
                return;
            }
        }

        let reason = loop {
            tokio::select! {
                frame = transport.recv() => match frame {
                    Ok(Some(text)) => emit(decode(text)),
                    Ok(None) => {
                        info!("Server closed connection");
                        break CloseReason::ServerClosed;
                    }
                    Err(TransportError::Protocol(detail)) => {
                        warn!("Dropping undecodable frame: {}", detail);
                        emit(Event::ProtocolError {
                            error: FrameError::InvalidUtf8(detail),
                            raw: String::new(),
                        });
                    }
                    Err(e) => {
                        error!("WebSocket error: {}", e);
                        emit(Event::TransportError(e));
                        break CloseReason::TransportError;
                    }
                },
                command = commands.recv() => match command {
                    Some(Command::Send(text, reply)) => {
                        debug!(len = text.len(), "Writing frame");
                        let result = transport.send(&text).await;
                        let failure = result.as_ref().err().cloned();
                        let _ = reply.send(result);
                        if let Some(e) = failure {
                            error!("WebSocket write failed: {}", e);
                            emit(Event::TransportError(e));
                            break CloseReason::TransportError;
                        }
                    }
                    Some(Command::Close) | None => {
                        if let Err(e) = transport.close().await {
                            warn!("Error during close handshake: {}", e);
                        }
                        break CloseReason::ClientRequested;
                    }
                },
            }
        };

        *state.write() = ConnectionState::Closed;
        debug!(?reason, "Connection driver finished");
        emit(Event::Closed(reason));
    }
}

/// Turn one inbound text frame into an event
fn decode(text: String) -> Event {
    match WsMessage::parse(&text) {
        Ok(message) => {
            debug!(msg_type = message.msg_type(), "Received frame");
            Event::Message(message)
        }
        Err(error) => {
            warn!("Failed to parse frame: {}", error);
            Event::ProtocolError { error, raw: text }
        }
    }
}
