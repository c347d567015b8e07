//! REST API client for the Decagon conversational AI service
//!
//! This crate covers the request/response side of the API: conversations,
//! message history, chat turns and satisfaction scores.
//!
//! # Features
//!
//! - **Conversations**: create, list, history, mark as read
//! - **Chat**: submit a turn and receive its events
//! - **CSAT**: record a satisfaction score
//!
//! # Authentication
//!
//! Every request carries four headers (`X-AUTH-USER-ID`, `X-AUTH-TEAM-ID`,
//! `X-AUTH-SIGNATURE`, `X-AUTH-EPOCH`) minted for that request alone by
//! [`decagon_auth::Authenticator`]. Arguments are validated before any
//! credential is derived or byte is sent.
//!
//! # Example
//!
//! ```no_run
//! use decagon_auth::{Authenticator, CredentialGenerator};
//! use decagon_rest::{ChatCompletionRequest, ClientConfig, DecagonRestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = Authenticator::new(CredentialGenerator::new("your-private-key"), "your-team-id");
//!     let client = DecagonRestClient::new(ClientConfig::new("https://api.decagon.ai"), auth)?;
//!
//!     let history = client.get_history("user123", "conv_1").await?;
//!     println!("{} messages", history.messages.len());
//!
//!     let turn = ChatCompletionRequest::new("conv_1", "Where is my order?", "flow123");
//!     let reply = client.send_chat_turn("user123", &turn).await?;
//!     for text in reply.texts() {
//!         println!("{}", text);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{ClientConfig, DecagonRestClient};
pub use error::{RestError, RestResult};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockHttpTransport;

// Re-export endpoint-specific types
pub use types::{
    // Conversations
    Conversation, ConversationHistoryResponse, MarkReadRequest, Message, NewConversationRequest,
    NewConversationResponse, UserConversationsResponse,
    // Chat
    ChatCompletionRequest, ChatCompletionResponse, ChatEvent,
    // Satisfaction
    SatisfactionRequest,
};
