//! WebSocket client for the Decagon conversational AI service
//!
//! This crate manages the lifecycle of one authenticated conversation
//! socket: connect, deliver decoded frames, send, close.
//!
//! # Features
//!
//! - Explicit state machine (`Idle`, `Connecting`, `Open`, `Closed`)
//! - Inbound frames decoded into [`decagon_types::WsMessage`]; malformed
//!   frames reported without dropping the connection
//! - Event channel with a callback adaptor ([`Handlers`])
//! - No automatic reconnection: a new connect starts a new connection
//!
//! # Example
//!
//! ```no_run
//! use decagon_auth::{Authenticator, CredentialGenerator};
//! use decagon_types::WsMessage;
//! use decagon_ws::{Connection, ConnectionConfig, Event, SocketUrl};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = Authenticator::new(CredentialGenerator::new("your-private-key"), "your-team-id");
//!     let socket_url = SocketUrl::from_base_url("https://api.decagon.ai")?;
//!     let url = socket_url.authenticated(&auth.authenticate("user123")?, Some("conv_1"))?;
//!
//!     let conn = ConnectionConfig::new(socket_url);
//!     let conn = Connection::new(conn);
//!     let mut events = conn.open(&url).await?;
//!
//!     while let Some(event) = events.recv().await {
//!         match event {
//!             Event::Opened => conn.send(&WsMessage::message("conv_1", "Hello")).await?,
//!             Event::Message(msg) => println!("{:?}", msg),
//!             Event::Closed(_) => break,
//!             other => eprintln!("{:?}", other),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod endpoint;
pub mod error;
pub mod events;
pub mod hooks;
pub mod transport;

// Re-export main types
pub use connection::{Connection, ConnectionConfig, ConnectionState};
pub use endpoint::{SocketUrl, SOCKET_PATH};
pub use error::{WsError, WsResult};
pub use events::{CloseReason, Event, EventReceiver};
pub use hooks::Handlers;
pub use transport::{Connector, Transport, TransportError, WsConnector, WsTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::{MockConnector, MockRemote, MockTransport};
