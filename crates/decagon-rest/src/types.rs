//! Types for Decagon REST API requests and responses
//!
//! Field layouts follow the service contract. Every response type keeps the
//! fields it does not model in a flattened `extra` map so newer server fields
//! survive a decode.

use decagon_types::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Conversation Types
// ============================================================================

/// Summary of one conversation as listed for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation ID
    pub id: String,
    /// Author of the latest entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Text of the latest entry
    #[serde(default)]
    pub text: String,
    /// Creation timestamp as sent by the service
    #[serde(default)]
    pub created_at: String,
    /// Human-readable age (e.g. "5m ago")
    #[serde(default)]
    pub time_ago: String,
    /// Messages the user has not read yet
    #[serde(default)]
    pub num_unread_messages: u32,
    /// Unmodelled fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of a conversation's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID
    pub id: u64,
    /// Owning conversation
    pub conversation_id: String,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Message text
    #[serde(default)]
    pub text: String,
    /// Creation timestamp as sent by the service
    #[serde(default)]
    pub created_at: String,
    /// Human-readable age
    #[serde(default)]
    pub time_ago: String,
    /// Unmodelled fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /conversation/new`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewConversationRequest {
    /// Flow to start the conversation in
    pub flow_id: String,
    /// Caller-defined metadata, passed through untouched
    pub metadata: Value,
}

/// Response of `POST /conversation/new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConversationResponse {
    /// ID of the created conversation
    pub conversation_id: String,
    /// Unmodelled fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /conversation/user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConversationsResponse {
    /// Conversations of the user
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    /// Unmodelled fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /conversation/history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistoryResponse {
    /// Messages, oldest first
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Where the conversation is currently routed
    #[serde(default)]
    pub destination: String,
    /// Unmodelled fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /conversation/mark_read`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkReadRequest {
    /// Conversation to mark as read
    pub conversation_id: String,
}

// ============================================================================
// Chat Types
// ============================================================================

/// Body of `POST /chat/completion`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    /// Conversation the turn belongs to
    pub conversation_id: String,
    /// User text
    pub text: String,
    /// Flow handling the turn
    pub flow_id: String,
    /// Caller-defined metadata, passed through untouched
    pub metadata: Value,
    /// Action chosen by the user, if the turn answers a prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
}

impl ChatCompletionRequest {
    /// Create a chat turn without metadata
    pub fn new(
        conversation_id: impl Into<String>,
        text: impl Into<String>,
        flow_id: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: text.into(),
            flow_id: flow_id.into(),
            metadata: Value::Object(Map::new()),
            action_id: None,
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Answer a prompt with an action
    pub fn with_action(mut self, action_id: impl Into<String>) -> Self {
        self.action_id = Some(action_id.into());
        self
    }
}

/// One event produced by a chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Event type
    #[serde(rename = "type")]
    pub event_type: String,
    /// Responder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Response text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Channel the event was produced on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Quick-reply choices offered to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    /// Multi-part message text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Vec<String>>,
    /// Error description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Unmodelled fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatEvent {
    /// Returns true if the event reports an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Response of `POST /chat/completion`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Events produced by the turn, in order
    #[serde(default)]
    pub events: Vec<ChatEvent>,
    /// Unmodelled fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionResponse {
    /// Texts of all events that carry one
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| e.text.as_deref())
    }
}

// ============================================================================
// Satisfaction Types
// ============================================================================

/// Body of `POST /csat/set`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionRequest {
    /// Rated conversation
    pub conversation_id: String,
    /// Satisfaction score
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_conversations() {
        let body = json!({
            "conversations": [{
                "id": "conv_1",
                "role": "AI",
                "text": "How can I help?",
                "created_at": "2024-05-01T10:00:00Z",
                "time_ago": "2h ago",
                "num_unread_messages": 2,
                "pinned": true
            }]
        });
        let resp: UserConversationsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.conversations.len(), 1);
        let conv = &resp.conversations[0];
        assert_eq!(conv.role, Some(Role::Ai));
        assert_eq!(conv.num_unread_messages, 2);
        assert_eq!(conv.extra.get("pinned"), Some(&json!(true)));
    }

    #[test]
    fn test_deserialize_history() {
        let body = json!({
            "messages": [{
                "id": 17,
                "conversation_id": "conv_1",
                "role": "USER",
                "text": "hello",
                "created_at": "2024-05-01T10:00:00Z",
                "time_ago": "2h ago"
            }],
            "destination": "AI"
        });
        let resp: ConversationHistoryResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.messages[0].id, 17);
        assert_eq!(resp.messages[0].role, Some(Role::User));
        assert_eq!(resp.destination, "AI");
    }

    #[test]
    fn test_unmodelled_role_decodes() {
        let body = json!({
            "messages": [{
                "id": 3,
                "conversation_id": "conv_1",
                "role": "SYSTEM",
                "text": "Conversation transferred",
                "created_at": "2024-05-01T10:00:00Z",
                "time_ago": "1h ago"
            }]
        });
        let resp: ConversationHistoryResponse = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(resp.messages[0].role, Some(Role::Other("SYSTEM".to_string())));
        assert_eq!(serde_json::to_value(&resp.messages[0]).unwrap(), body["messages"][0]);
    }

    #[test]
    fn test_missing_descriptive_fields_default() {
        let body = json!({
            "conversations": [
                {"id": "conv_1", "role": "AI", "text": "Hi", "created_at": "2024-05-01T10:00:00Z"},
                {"id": "conv_2"}
            ]
        });
        let resp: UserConversationsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.conversations.len(), 2);
        assert_eq!(resp.conversations[0].time_ago, "");
        assert_eq!(resp.conversations[0].num_unread_messages, 0);
        assert_eq!(resp.conversations[1].id, "conv_2");
        assert!(resp.conversations[1].role.is_none());
    }

    #[test]
    fn test_chat_request_serialization() {
        let req = ChatCompletionRequest::new("conv_1", "Hello", "flow123")
            .with_metadata(json!({"key": "value"}));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "conversation_id": "conv_1",
                "text": "Hello",
                "flow_id": "flow123",
                "metadata": {"key": "value"}
            })
        );

        let with_action = serde_json::to_value(req.with_action("act_9")).unwrap();
        assert_eq!(with_action["action_id"], "act_9");
    }

    #[test]
    fn test_deserialize_chat_events() {
        let body = json!({
            "events": [
                {"type": "chat_response", "role": "AI", "text": "Sure", "choices": ["a", "b"]},
                {"type": "error", "error": "flow not found"}
            ]
        });
        let resp: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.events.len(), 2);
        assert_eq!(resp.texts().collect::<Vec<_>>(), vec!["Sure"]);
        assert!(resp.events[1].is_error());
        assert_eq!(resp.events[0].choices.as_ref().map(Vec::len), Some(2));
    }
}
