//! WebSocket transport abstraction
//!
//! The connection driver talks to the socket only through [`Transport`], and
//! obtains transports from a [`Connector`]. Production code uses
//! [`WsTransport`] over `tokio-tungstenite`; tests use [`MockTransport`],
//! whose paired [`MockRemote`] plays the server: it fires the open event,
//! pushes frames, closes, and records what the client wrote.
//!
//! # Example
//!
//! ```no_run
//! use decagon_ws::transport::{Transport, TransportError, WsTransport};
//!
//! async fn example() -> Result<(), TransportError> {
//!     let mut transport = WsTransport::new("wss://api.decagon.ai/ws?user_id=u");
//!     transport.connect().await?;
//!     transport.send(r#"{"type":"message","data":{"text":"hi"}}"#).await?;
//!     if let Some(frame) = transport.recv().await? {
//!         println!("Received: {}", frame);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use decagon_types::ErrorKind;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, instrument};

/// Default time allowed for the WebSocket handshake
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport layer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Connection timeout
    #[error("connection timeout after {0:?}")]
    Timeout(Duration),

    /// Not connected
    #[error("not connected")]
    NotConnected,

    /// Frame that cannot be turned into text
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl TransportError {
    /// Map onto the shared error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConnected => ErrorKind::NotConnected,
            Self::Protocol(_) => ErrorKind::Protocol,
            _ => ErrorKind::Transport,
        }
    }
}

/// Trait for WebSocket transport abstraction
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the socket; resolves once the handshake completes
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Send a text frame
    async fn send(&mut self, message: &str) -> Result<(), TransportError>;

    /// Receive the next text frame
    ///
    /// Returns `None` once the peer has closed the connection.
    async fn recv(&mut self) -> Result<Option<String>, TransportError>;

    /// Close the connection gracefully
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Check if currently connected
    fn is_connected(&self) -> bool;

    /// Get the endpoint URL
    fn endpoint(&self) -> &str;
}

/// Factory for transports, one per `connect`
pub trait Connector: Send + Sync {
    /// Create an unconnected transport for `url`
    fn transport(&self, url: &str) -> Box<dyn Transport>;
}

/// Real WebSocket transport using tokio-tungstenite
pub struct WsTransport {
    url: String,
    stream: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
    connect_timeout: Duration,
}

impl WsTransport {
    /// Create a new WebSocket transport
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            stream: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

#[async_trait]
impl Transport for WsTransport {
    // The URL carries the signature, so it stays out of the span.
    #[instrument(skip(self))]
    async fn connect(&mut self) -> Result<(), TransportError> {
        debug!("Connecting to WebSocket");

        let (ws_stream, _response) = timeout(self.connect_timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| TransportError::Timeout(self.connect_timeout))?
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        self.stream = Some(ws_stream);
        debug!("WebSocket connected");
        Ok(())
    }

    #[instrument(skip(self, message), fields(len = message.len()))]
    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        stream
            .send(Message::Text(message.to_string()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Binary(data))) => {
                    return String::from_utf8(data)
                        .map(Some)
                        .map_err(|e| TransportError::Protocol(e.to_string()));
                }
                Some(Ok(Message::Ping(data))) => {
                    stream
                        .send(Message::Pong(data))
                        .await
                        .map_err(|e| TransportError::SendFailed(e.to_string()))?;
                }
                Some(Ok(Message::Pong(_))) | Some(Ok(Message::Frame(_))) => {}
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "Peer closed WebSocket");
                    self.stream = None;
                    return Ok(None);
                }
                Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
                None => {
                    self.stream = None;
                    return Ok(None);
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut stream) = self.stream.take() {
            stream
                .close(None)
                .await
                .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Connector producing [`WsTransport`]s
#[derive(Debug, Clone)]
pub struct WsConnector {
    connect_timeout: Duration,
}

impl WsConnector {
    /// Create a connector with the given handshake timeout
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for WsConnector {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl Connector for WsConnector {
    fn transport(&self, url: &str) -> Box<dyn Transport> {
        Box::new(WsTransport::new(url).with_timeout(self.connect_timeout))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockConnector, MockRemote, MockTransport};

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use super::{Connector, Transport, TransportError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// What the fake server does next
    #[derive(Debug)]
    enum Scripted {
        Open,
        Frame(String),
        Close,
        Error(TransportError),
    }

    #[derive(Debug, Default)]
    struct Wire {
        sent: Mutex<Vec<String>>,
        closes: AtomicUsize,
    }

    /// Mock transport for testing
    ///
    /// `connect` waits until the paired [`MockRemote`] calls
    /// [`MockRemote::open`], so tests observe the `Connecting` state.
    #[derive(Debug)]
    pub struct MockTransport {
        url: String,
        connected: bool,
        inbound: mpsc::UnboundedReceiver<Scripted>,
        wire: Arc<Wire>,
    }

    /// Server side of a [`MockTransport`]
    #[derive(Debug, Clone)]
    pub struct MockRemote {
        inbound: mpsc::UnboundedSender<Scripted>,
        wire: Arc<Wire>,
    }

    impl MockTransport {
        /// Create a transport and the handle that drives it
        pub fn new(url: impl Into<String>) -> (Self, MockRemote) {
            let (tx, rx) = mpsc::unbounded_channel();
            let wire = Arc::new(Wire::default());
            let transport = Self {
                url: url.into(),
                connected: false,
                inbound: rx,
                wire: wire.clone(),
            };
            (transport, MockRemote { inbound: tx, wire })
        }
    }

    impl MockRemote {
        /// Complete the handshake
        pub fn open(&self) {
            let _ = self.inbound.send(Scripted::Open);
        }

        /// Deliver a text frame to the client
        pub fn push_frame(&self, frame: impl Into<String>) {
            let _ = self.inbound.send(Scripted::Frame(frame.into()));
        }

        /// Close the connection from the server side
        pub fn push_close(&self) {
            let _ = self.inbound.send(Scripted::Close);
        }

        /// Fail the next receive (or the handshake, if not yet open)
        pub fn push_error(&self, error: TransportError) {
            let _ = self.inbound.send(Scripted::Error(error));
        }

        /// Frames the client has written
        pub fn sent(&self) -> Vec<String> {
            self.wire.sent.lock().clone()
        }

        /// Number of times the client closed the socket
        pub fn close_count(&self) -> usize {
            self.wire.closes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn connect(&mut self) -> Result<(), TransportError> {
            loop {
                match self.inbound.recv().await {
                    Some(Scripted::Open) => {
                        self.connected = true;
                        return Ok(());
                    }
                    Some(Scripted::Error(e)) => return Err(e),
                    Some(Scripted::Close) | None => {
                        return Err(TransportError::ConnectionFailed(
                            "closed during handshake".into(),
                        ))
                    }
                    Some(Scripted::Frame(_)) => {}
                }
            }
        }

        async fn send(&mut self, message: &str) -> Result<(), TransportError> {
            if !self.connected {
                return Err(TransportError::NotConnected);
            }
            self.wire.sent.lock().push(message.to_string());
            Ok(())
        }

        async fn recv(&mut self) -> Result<Option<String>, TransportError> {
            if !self.connected {
                return Err(TransportError::NotConnected);
            }
            match self.inbound.recv().await {
                Some(Scripted::Frame(frame)) => Ok(Some(frame)),
                Some(Scripted::Error(e)) => Err(e),
                Some(Scripted::Close) | None => {
                    self.connected = false;
                    Ok(None)
                }
                Some(Scripted::Open) => Err(TransportError::Protocol("duplicate open".into())),
            }
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            self.connected = false;
            self.wire.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn endpoint(&self) -> &str {
            &self.url
        }
    }

    /// Connector handing out [`MockTransport`]s
    ///
    /// Keeps the remote of every transport it created along with the URL it
    /// was asked to connect to.
    #[derive(Debug, Default)]
    pub struct MockConnector {
        created: Mutex<Vec<(String, MockRemote)>>,
    }

    impl MockConnector {
        /// Create a new mock connector
        pub fn new() -> Self {
            Self::default()
        }

        /// Remote of the `index`-th transport created
        pub fn remote(&self, index: usize) -> Option<MockRemote> {
            self.created.lock().get(index).map(|(_, remote)| remote.clone())
        }

        /// Remote of the most recent transport
        pub fn last_remote(&self) -> Option<MockRemote> {
            self.created.lock().last().map(|(_, remote)| remote.clone())
        }

        /// URLs connected to, in order
        pub fn urls(&self) -> Vec<String> {
            self.created.lock().iter().map(|(url, _)| url.clone()).collect()
        }

        /// Number of transports created
        pub fn connect_count(&self) -> usize {
            self.created.lock().len()
        }
    }

    impl Connector for MockConnector {
        fn transport(&self, url: &str) -> Box<dyn Transport> {
            let (transport, remote) = MockTransport::new(url);
            self.created.lock().push((url.to_string(), remote));
            Box::new(transport)
        }
    }
}
