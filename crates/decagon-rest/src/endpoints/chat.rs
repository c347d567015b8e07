//! Chat endpoints

use crate::client::{require_non_empty, DecagonRestClient};
use crate::error::{RestError, RestResult};
use crate::transport::HttpRequest;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};
use tracing::instrument;

/// Chat endpoints
pub struct ChatEndpoints<'a> {
    client: &'a DecagonRestClient,
}

impl<'a> ChatEndpoints<'a> {
    pub fn new(client: &'a DecagonRestClient) -> Self {
        Self { client }
    }

    /// Submit a chat turn and return the events it produced
    ///
    /// # Arguments
    /// * `subject_id` - User sending the turn
    /// * `request` - Conversation, text, flow and metadata of the turn
    #[instrument(skip(self, request), fields(conversation_id = %request.conversation_id))]
    pub async fn completion(
        &self,
        subject_id: &str,
        request: &ChatCompletionRequest,
    ) -> RestResult<ChatCompletionResponse> {
        require_non_empty(&[
            ("subject_id", subject_id),
            ("conversation_id", request.conversation_id.as_str()),
            ("text", request.text.as_str()),
            ("flow_id", request.flow_id.as_str()),
        ])?;
        if let Some(action_id) = &request.action_id {
            require_non_empty(&[("action_id", action_id.as_str())])?;
        }

        let body = serde_json::to_value(request).map_err(|e| RestError::InvalidInput(e.to_string()))?;

        let headers = self.client.authenticate(subject_id)?;
        self.client
            .send(HttpRequest::post("/chat/completion", headers, body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::DecagonRestClient;
    use crate::error::RestError;
    use crate::transport::MockHttpTransport;
    use crate::types::ChatCompletionRequest;
    use decagon_auth::{Authenticator, CredentialGenerator};
    use decagon_types::Role;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: Arc<MockHttpTransport>) -> DecagonRestClient {
        let auth = Authenticator::new(CredentialGenerator::new("secret"), "team_42");
        DecagonRestClient::with_transport(transport, auth)
    }

    #[tokio::test]
    async fn test_chat_completion() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.push_json(
            200,
            json!({"events": [{"type": "chat_response", "role": "AI", "text": "Hi there"}]}),
        );
        let client = client(transport.clone());

        let request = ChatCompletionRequest::new("conv_1", "Hello, how can I help you?", "flow123")
            .with_metadata(json!({"key": "value"}));
        let resp = client.chat().completion("user123", &request).await.unwrap();

        assert_eq!(resp.events.len(), 1);
        assert_eq!(resp.events[0].role, Some(Role::Ai));

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/chat/completion");
        assert_eq!(sent.body.as_ref().unwrap()["text"], "Hello, how can I help you?");
    }

    #[tokio::test]
    async fn test_chat_completion_validation() {
        let transport = Arc::new(MockHttpTransport::new());
        let client = client(transport.clone());

        let cases = [
            ChatCompletionRequest::new("", "text", "flow"),
            ChatCompletionRequest::new("conv", "", "flow"),
            ChatCompletionRequest::new("conv", "text", ""),
            ChatCompletionRequest::new("conv", "text", "flow").with_action(""),
        ];
        for request in &cases {
            let err = client.chat().completion("user123", request).await.unwrap_err();
            assert!(matches!(err, RestError::InvalidInput(_)), "{:?}", request);
        }

        let ok = ChatCompletionRequest::new("conv", "text", "flow");
        let err = client.chat().completion("", &ok).await.unwrap_err();
        assert!(matches!(err, RestError::InvalidInput(_)));

        assert_eq!(transport.request_count(), 0);
    }
}
