//! Customer satisfaction endpoints

use crate::client::{require_non_empty, DecagonRestClient};
use crate::error::{RestError, RestResult};
use crate::transport::HttpRequest;
use crate::types::SatisfactionRequest;
use serde_json::Value;
use tracing::instrument;

/// Satisfaction survey endpoints
pub struct CsatEndpoints<'a> {
    client: &'a DecagonRestClient,
}

impl<'a> CsatEndpoints<'a> {
    pub fn new(client: &'a DecagonRestClient) -> Self {
        Self { client }
    }

    /// Record a satisfaction score for a conversation
    ///
    /// Returns the service's acknowledgement as-is.
    #[instrument(skip(self))]
    pub async fn set(&self, subject_id: &str, conversation_id: &str, score: u32) -> RestResult<Value> {
        require_non_empty(&[("subject_id", subject_id), ("conversation_id", conversation_id)])?;

        let body = serde_json::to_value(SatisfactionRequest {
            conversation_id: conversation_id.to_string(),
            score,
        })
        .map_err(|e| RestError::InvalidInput(e.to_string()))?;

        let headers = self.client.authenticate(subject_id)?;
        self.client
            .send(HttpRequest::post("/csat/set", headers, body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::DecagonRestClient;
    use crate::error::RestError;
    use crate::transport::MockHttpTransport;
    use decagon_auth::{Authenticator, CredentialGenerator};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_set_score() {
        let transport = Arc::new(MockHttpTransport::new());
        let auth = Authenticator::new(CredentialGenerator::new("secret"), "team_42");
        let client = DecagonRestClient::with_transport(transport.clone(), auth);

        client.csat().set("user123", "conv_1", 4).await.unwrap();
        let err = client.csat().set("user123", "", 4).await.unwrap_err();
        assert!(matches!(err, RestError::InvalidInput(_)));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, Some(json!({"conversation_id": "conv_1", "score": 4})));
    }

    #[tokio::test]
    async fn test_empty_secret_fails_before_io() {
        let transport = Arc::new(MockHttpTransport::new());
        let auth = Authenticator::new(CredentialGenerator::new(""), "team_42");
        let client = DecagonRestClient::with_transport(transport.clone(), auth);

        let err = client.csat().set("user123", "conv_1", 4).await.unwrap_err();
        assert_eq!(err.kind(), decagon_types::ErrorKind::Configuration);
        assert_eq!(transport.request_count(), 0);
    }
}
