//! High-level Decagon session client

use crate::builder::SessionClientBuilder;
use crate::error::{SdkError, SdkResult};
use decagon_auth::Authenticator;
use decagon_rest::{
    ChatCompletionRequest, ChatCompletionResponse, ConversationHistoryResponse, DecagonRestClient,
    NewConversationResponse, UserConversationsResponse,
};
use decagon_types::WsMessage;
use decagon_ws::{Connection, ConnectionState, EventReceiver, Handlers};
use serde_json::Value;
use std::fmt;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

/// Client for one team of the Decagon API
///
/// REST calls authenticate per request, so one client may serve many
/// subjects concurrently. The client owns at most one WebSocket connection;
/// connecting again closes the previous one first.
///
/// # Example
///
/// ```no_run
/// use decagon_sdk::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SessionClient::new("https://api.decagon.ai", "your-team-id", "your-private-key")?;
///
///     let created = client
///         .create_conversation("user123", "flow123", serde_json::json!({}))
///         .await?;
///
///     let mut events = client.connect("user123", Some(&created.conversation_id)).await?;
///     while let Some(event) = events.recv().await {
///         match event {
///             Event::Opened => client.send_text(&created.conversation_id, "Hello").await?,
///             Event::Message(msg) => println!("{:?}", msg),
///             Event::Closed(_) => break,
///             _ => {}
///         }
///     }
///
///     Ok(())
/// }
/// ```
pub struct SessionClient {
    rest: DecagonRestClient,
    authenticator: Authenticator,
    connection: Connection,
}

impl SessionClient {
    /// Create a client builder
    pub fn builder(
        base_url: impl Into<String>,
        team_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> SessionClientBuilder {
        SessionClientBuilder::new(base_url, team_id, secret)
    }

    /// Create a client with default settings
    pub fn new(
        base_url: impl Into<String>,
        team_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> SdkResult<Self> {
        Self::builder(base_url, team_id, secret).build()
    }

    pub(crate) fn from_parts(
        rest: DecagonRestClient,
        authenticator: Authenticator,
        connection: Connection,
    ) -> Self {
        Self {
            rest,
            authenticator,
            connection,
        }
    }

    /// The team this client authenticates as
    pub fn team_id(&self) -> &str {
        self.authenticator.team_id()
    }

    /// The underlying REST client
    pub fn rest(&self) -> &DecagonRestClient {
        &self.rest
    }

    // ========================================================================
    // REST
    // ========================================================================

    /// Create a new conversation
    pub async fn create_conversation(
        &self,
        subject_id: &str,
        flow_id: &str,
        metadata: Value,
    ) -> SdkResult<NewConversationResponse> {
        Ok(self.rest.create_conversation(subject_id, flow_id, metadata).await?)
    }

    /// List the conversations of a user
    pub async fn list_conversations(&self, subject_id: &str) -> SdkResult<UserConversationsResponse> {
        Ok(self.rest.list_conversations(subject_id).await?)
    }

    /// Get the message history of a conversation
    pub async fn get_history(
        &self,
        subject_id: &str,
        conversation_id: &str,
    ) -> SdkResult<ConversationHistoryResponse> {
        Ok(self.rest.get_history(subject_id, conversation_id).await?)
    }

    /// Submit a chat turn
    pub async fn send_chat_turn(
        &self,
        subject_id: &str,
        request: &ChatCompletionRequest,
    ) -> SdkResult<ChatCompletionResponse> {
        Ok(self.rest.send_chat_turn(subject_id, request).await?)
    }

    /// Mark a conversation as read
    pub async fn mark_read(&self, subject_id: &str, conversation_id: &str) -> SdkResult<Value> {
        Ok(self.rest.mark_read(subject_id, conversation_id).await?)
    }

    /// Record a satisfaction score
    pub async fn set_satisfaction_score(
        &self,
        subject_id: &str,
        conversation_id: &str,
        score: u32,
    ) -> SdkResult<Value> {
        Ok(self
            .rest
            .set_satisfaction_score(subject_id, conversation_id, score)
            .await?)
    }

    // ========================================================================
    // WebSocket
    // ========================================================================

    /// Get the connection state
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Check if the socket is open
    pub fn is_connected(&self) -> bool {
        self.connection.is_open()
    }

    /// Open the conversation socket for `subject_id`
    ///
    /// Derives a fresh credential and embeds it in the socket URL. Returns in
    /// `Connecting`; the first event is `Opened` once the handshake succeeds.
    #[instrument(skip(self))]
    pub async fn connect(
        &self,
        subject_id: &str,
        conversation_id: Option<&str>,
    ) -> SdkResult<EventReceiver> {
        if subject_id.is_empty() {
            return Err(SdkError::InvalidInput("subject_id must not be empty".to_string()));
        }

        let headers = self.authenticator.authenticate(subject_id)?;
        let url = self
            .connection
            .socket_url()
            .authenticated(&headers, conversation_id)?;

        info!("Opening conversation socket");
        Ok(self.connection.open(&url).await?)
    }

    /// Open the conversation socket and drive `handlers` from its events
    ///
    /// The returned task finishes after the connection's `Closed` event.
    pub async fn connect_with_handlers(
        &self,
        subject_id: &str,
        conversation_id: Option<&str>,
        handlers: Handlers,
    ) -> SdkResult<JoinHandle<()>> {
        let events = self.connect(subject_id, conversation_id).await?;
        Ok(tokio::spawn(handlers.run(events)))
    }

    /// Send a message over the open socket
    pub async fn send(&self, message: &WsMessage) -> SdkResult<()> {
        Ok(self.connection.send(message).await?)
    }

    /// Send a `message` frame with the given text
    pub async fn send_text(&self, conversation_id: &str, text: &str) -> SdkResult<()> {
        self.send(&WsMessage::message(conversation_id, text)).await
    }

    /// Close the socket; does nothing if there is none
    pub async fn close(&self) {
        self.connection.close().await;
    }
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("team_id", &self.team_id())
            .field("connection", &self.connection)
            .finish()
    }
}
