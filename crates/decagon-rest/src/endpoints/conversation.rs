//! Conversation endpoints
//!
//! Create, list, read history of and mark conversations as read.

use crate::client::{require_non_empty, DecagonRestClient};
use crate::error::{RestError, RestResult};
use crate::transport::HttpRequest;
use crate::types::{
    ConversationHistoryResponse, MarkReadRequest, NewConversationRequest,
    NewConversationResponse, UserConversationsResponse,
};
use serde_json::Value;
use tracing::instrument;

/// Conversation endpoints
pub struct ConversationEndpoints<'a> {
    client: &'a DecagonRestClient,
}

impl<'a> ConversationEndpoints<'a> {
    pub fn new(client: &'a DecagonRestClient) -> Self {
        Self { client }
    }

    /// Create a new conversation
    ///
    /// # Arguments
    /// * `subject_id` - User the conversation belongs to
    /// * `flow_id` - Flow to start the conversation in
    /// * `metadata` - Caller-defined metadata, passed through untouched
    #[instrument(skip(self, metadata))]
    pub async fn create(
        &self,
        subject_id: &str,
        flow_id: &str,
        metadata: Value,
    ) -> RestResult<NewConversationResponse> {
        require_non_empty(&[("subject_id", subject_id), ("flow_id", flow_id)])?;

        let body = NewConversationRequest {
            flow_id: flow_id.to_string(),
            metadata,
        };
        let body = serde_json::to_value(&body).map_err(|e| RestError::InvalidInput(e.to_string()))?;

        let headers = self.client.authenticate(subject_id)?;
        self.client
            .send(HttpRequest::post("/conversation/new", headers, body))
            .await
    }

    /// List the conversations of a user
    #[instrument(skip(self))]
    pub async fn list(&self, subject_id: &str) -> RestResult<UserConversationsResponse> {
        require_non_empty(&[("subject_id", subject_id)])?;

        let headers = self.client.authenticate(subject_id)?;
        self.client
            .send(HttpRequest::get("/conversation/user", headers))
            .await
    }

    /// Get the message history of a conversation
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        subject_id: &str,
        conversation_id: &str,
    ) -> RestResult<ConversationHistoryResponse> {
        require_non_empty(&[("subject_id", subject_id), ("conversation_id", conversation_id)])?;

        let headers = self.client.authenticate(subject_id)?;
        let request = HttpRequest::get("/conversation/history", headers)
            .with_query("conversation_id", conversation_id);
        self.client.send(request).await
    }

    /// Mark a conversation as read
    ///
    /// Returns the service's acknowledgement as-is.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, subject_id: &str, conversation_id: &str) -> RestResult<Value> {
        require_non_empty(&[("subject_id", subject_id), ("conversation_id", conversation_id)])?;

        let body = serde_json::to_value(MarkReadRequest {
            conversation_id: conversation_id.to_string(),
        })
        .map_err(|e| RestError::InvalidInput(e.to_string()))?;

        let headers = self.client.authenticate(subject_id)?;
        self.client
            .send(HttpRequest::post("/conversation/mark_read", headers, body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::DecagonRestClient;
    use crate::error::RestError;
    use crate::transport::{HttpMethod, MockHttpTransport};
    use decagon_auth::{Authenticator, CredentialGenerator, FixedClock, HEADER_EPOCH};
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: Arc<MockHttpTransport>) -> DecagonRestClient {
        let generator =
            CredentialGenerator::new("secret").with_clock(Arc::new(FixedClock::new(1_000)));
        DecagonRestClient::with_transport(transport, Authenticator::new(generator, "team_42"))
    }

    #[tokio::test]
    async fn test_create_conversation() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.push_json(200, json!({"conversation_id": "conv_1"}));
        let client = client(transport.clone());

        let resp = client
            .conversations()
            .create("user123", "flow123", json!({"key": "value"}))
            .await
            .unwrap();
        assert_eq!(resp.conversation_id, "conv_1");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].path, "/conversation/new");
        assert_eq!(
            requests[0].body,
            Some(json!({"flow_id": "flow123", "metadata": {"key": "value"}}))
        );
        assert_eq!(requests[0].headers.user_id(), "user123");
        assert_eq!(requests[0].headers.team_id(), "team_42");
        assert_eq!(requests[0].headers.epoch(), "87400");
    }

    #[tokio::test]
    async fn test_create_validates_before_io() {
        let transport = Arc::new(MockHttpTransport::new());
        let client = client(transport.clone());

        let err = client
            .conversations()
            .create("", "flow123", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidInput(_)));

        let err = client
            .conversations()
            .create("user123", "", json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("flow_id"));

        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_history_query() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.push_json(200, json!({"messages": [], "destination": "AI"}));
        let client = client(transport.clone());

        let resp = client
            .conversations()
            .history("user123", "conv_1")
            .await
            .unwrap();
        assert!(resp.messages.is_empty());

        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/conversation/history");
        assert_eq!(request.query, vec![("conversation_id", "conv_1".to_string())]);
    }

    #[tokio::test]
    async fn test_history_requires_conversation() {
        let transport = Arc::new(MockHttpTransport::new());
        let client = client(transport.clone());

        let err = client.conversations().history("user123", "").await.unwrap_err();
        assert!(matches!(err, RestError::InvalidInput(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_list_and_mark_read() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.push_json(200, json!({"conversations": []}));
        transport.push_json(200, json!({"success": true}));
        let client = client(transport.clone());

        let list = client.conversations().list("user123").await.unwrap();
        assert!(list.conversations.is_empty());

        let ack = client.conversations().mark_read("user123", "conv_1").await.unwrap();
        assert_eq!(ack["success"], true);

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/conversation/user");
        assert_eq!(requests[1].path, "/conversation/mark_read");
        assert_eq!(requests[1].body, Some(json!({"conversation_id": "conv_1"})));
    }

    #[tokio::test]
    async fn test_headers_minted_per_request() {
        let transport = Arc::new(MockHttpTransport::new());
        let clock = Arc::new(FixedClock::new(1_000));
        let generator = CredentialGenerator::new("secret").with_clock(clock.clone());
        let client =
            DecagonRestClient::with_transport(transport.clone(), Authenticator::new(generator, "t"));

        client.conversations().list("alice").await.unwrap();
        clock.advance(5);
        client.conversations().list("bob").await.unwrap();

        let requests = transport.requests();
        let epochs: Vec<_> = requests
            .iter()
            .map(|r| {
                r.headers
                    .header_pairs()
                    .iter()
                    .find(|(name, _)| *name == HEADER_EPOCH)
                    .map(|(_, v)| v.to_string())
                    .unwrap()
            })
            .collect();
        assert_eq!(epochs, vec!["87400", "87405"]);
        assert_eq!(requests[0].headers.user_id(), "alice");
        assert_eq!(requests[1].headers.user_id(), "bob");
    }
}
