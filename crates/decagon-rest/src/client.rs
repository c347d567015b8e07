//! Main REST client implementation

use crate::endpoints::{ChatEndpoints, ConversationEndpoints, CsatEndpoints};
use crate::error::{RestError, RestResult};
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, ConversationHistoryResponse,
    NewConversationResponse, UserConversationsResponse,
};
use decagon_auth::{AuthHeaders, Authenticator};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent
const DEFAULT_USER_AGENT: &str = concat!("decagon-rest/", env!("CARGO_PKG_VERSION"));

/// Decagon REST API client
///
/// Every call mints a fresh credential for the given subject and sends it
/// with that request only, so one client can serve many users concurrently.
///
/// # Example
///
/// ```no_run
/// use decagon_auth::{Authenticator, CredentialGenerator};
/// use decagon_rest::{ClientConfig, DecagonRestClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let auth = Authenticator::new(CredentialGenerator::new("your-private-key"), "your-team-id");
///     let client = DecagonRestClient::new(ClientConfig::new("https://api.decagon.ai"), auth)?;
///
///     let created = client
///         .create_conversation("user123", "flow123", serde_json::json!({"key": "value"}))
///         .await?;
///     println!("New conversation: {}", created.conversation_id);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DecagonRestClient {
    transport: Arc<dyn HttpTransport>,
    authenticator: Authenticator,
}

impl DecagonRestClient {
    /// Create a client backed by `reqwest`
    pub fn new(config: ClientConfig, authenticator: Authenticator) -> RestResult<Self> {
        let transport = ReqwestTransport::new(
            &config.base_url,
            config.timeout,
            config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
        )?;

        info!(base_url = %transport.base_url(), "Created Decagon REST client");

        Ok(Self::with_transport(Arc::new(transport), authenticator))
    }

    /// Create a client over a custom transport
    pub fn with_transport(transport: Arc<dyn HttpTransport>, authenticator: Authenticator) -> Self {
        Self {
            transport,
            authenticator,
        }
    }

    /// The team this client authenticates as
    pub fn team_id(&self) -> &str {
        self.authenticator.team_id()
    }

    /// Mint the auth headers for one request
    pub fn authenticate(&self, subject_id: &str) -> RestResult<AuthHeaders> {
        Ok(self.authenticator.authenticate(subject_id)?)
    }

    /// Send a request and decode the JSON response
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> RestResult<T> {
        let method = request.method;
        let path = request.path;
        debug!(%method, path, "Sending request");

        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            warn!(%method, path, status = response.status, "Request rejected");
            return Err(RestError::Api {
                status: response.status,
                message: response.body,
            });
        }

        serde_json::from_str(&response.body)
            .map_err(|e| RestError::Decode(format!("{} {}: {}", method, path, e)))
    }

    // ========================================================================
    // Endpoint Groups
    // ========================================================================

    /// Conversation endpoints
    pub fn conversations(&self) -> ConversationEndpoints<'_> {
        ConversationEndpoints::new(self)
    }

    /// Chat endpoints
    pub fn chat(&self) -> ChatEndpoints<'_> {
        ChatEndpoints::new(self)
    }

    /// Satisfaction survey endpoints
    pub fn csat(&self) -> CsatEndpoints<'_> {
        CsatEndpoints::new(self)
    }

    // ========================================================================
    // Shortcuts
    // ========================================================================

    /// Create a new conversation
    pub async fn create_conversation(
        &self,
        subject_id: &str,
        flow_id: &str,
        metadata: Value,
    ) -> RestResult<NewConversationResponse> {
        self.conversations().create(subject_id, flow_id, metadata).await
    }

    /// List the conversations of a user
    pub async fn list_conversations(&self, subject_id: &str) -> RestResult<UserConversationsResponse> {
        self.conversations().list(subject_id).await
    }

    /// Get the message history of a conversation
    pub async fn get_history(
        &self,
        subject_id: &str,
        conversation_id: &str,
    ) -> RestResult<ConversationHistoryResponse> {
        self.conversations().history(subject_id, conversation_id).await
    }

    /// Mark a conversation as read
    pub async fn mark_read(&self, subject_id: &str, conversation_id: &str) -> RestResult<Value> {
        self.conversations().mark_read(subject_id, conversation_id).await
    }

    /// Submit a chat turn
    pub async fn send_chat_turn(
        &self,
        subject_id: &str,
        request: &ChatCompletionRequest,
    ) -> RestResult<ChatCompletionResponse> {
        self.chat().completion(subject_id, request).await
    }

    /// Record a satisfaction score for a conversation
    pub async fn set_satisfaction_score(
        &self,
        subject_id: &str,
        conversation_id: &str,
        score: u32,
    ) -> RestResult<Value> {
        self.csat().set(subject_id, conversation_id, score).await
    }
}

impl std::fmt::Debug for DecagonRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecagonRestClient")
            .field("team_id", &self.team_id())
            .finish()
    }
}

/// Fail with [`RestError::InvalidInput`] if any named argument is empty
pub(crate) fn require_non_empty(args: &[(&str, &str)]) -> RestResult<()> {
    match args.iter().find(|(_, value)| value.is_empty()) {
        Some((name, _)) => Err(RestError::empty(name)),
        None => Ok(()),
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service (e.g. "https://api.decagon.ai")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
