//! High-level SDK for the Decagon conversational AI service
//!
//! One [`SessionClient`] per team and shared secret covers both halves of
//! the API: authenticated REST calls on behalf of any end user, and a single
//! conversation WebSocket.
//!
//! # Quick Start
//!
//! ```no_run
//! use decagon_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SessionClient::new("https://api.decagon.ai", "your-team-id", "your-private-key")?;
//!
//!     let history = client.get_history("user123", "conv_1").await?;
//!     println!("{} messages so far", history.messages.len());
//!
//!     let handlers = Handlers::new(|msg| println!("{:?}", msg))
//!         .on_open(|| println!("connected"))
//!         .on_close(|reason| println!("closed: {:?}", reason));
//!     let task = client
//!         .connect_with_handlers("user123", Some("conv_1"), handlers)
//!         .await?;
//!
//!     // ... later
//!     client.close().await;
//!     task.await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Per-request authentication**: every REST call and every connect
//!   derives a fresh HMAC-SHA256 credential
//! - **Explicit connection lifecycle**: `Idle`, `Connecting`, `Open`, `Closed`
//! - **Event channel**: decoded frames, protocol errors and close reasons,
//!   with a callback adaptor on top
//! - **Pluggable I/O**: HTTP transport and socket connector can be replaced

pub mod builder;
pub mod client;
pub mod error;
pub mod prelude;

// Re-export main types
pub use builder::SessionClientBuilder;
pub use client::SessionClient;
pub use error::{SdkError, SdkResult};

// Re-export commonly used types from dependencies
pub use decagon_types::{ErrorKind, WsMessage};
pub use decagon_ws::{CloseReason, ConnectionState, Event, EventReceiver, Handlers};
