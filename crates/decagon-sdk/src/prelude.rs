//! Re-exports for convenience
//!
//! Import everything you need with:
//! ```
//! use decagon_sdk::prelude::*;
//! ```

// Client
pub use crate::builder::SessionClientBuilder;
pub use crate::client::SessionClient;
pub use crate::error::{SdkError, SdkResult};

// Shared types
pub use decagon_types::{
    ChatMessageData, ErrorData, ErrorKind, FrameError, Map, Role, Value, WsMessage,
};

// REST types
pub use decagon_rest::{
    ChatCompletionRequest, ChatCompletionResponse, ChatEvent, Conversation,
    ConversationHistoryResponse, Message, NewConversationResponse, UserConversationsResponse,
};

// WebSocket types
pub use decagon_ws::{CloseReason, ConnectionState, Event, EventReceiver, Handlers};

// Credentials
pub use decagon_auth::{Clock, Credential, CredentialGenerator, FixedClock, SystemClock};
