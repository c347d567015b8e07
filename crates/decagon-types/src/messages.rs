//! WebSocket frame types
//!
//! Every frame exchanged with the service is a JSON object carrying a `type`
//! discriminator and a `data` payload. Types this client knows about are
//! decoded into typed variants; everything else is kept verbatim in
//! [`WsMessage::Unknown`] so new server-side message kinds pass through
//! untouched.

use crate::{FrameError, MessageType, Role};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Payload Types
// ============================================================================

/// Payload of `message` and `chat_message` frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageData {
    /// Conversation the text belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Message text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Author of the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Fields this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessageData {
    /// Create a payload carrying text for a conversation
    pub fn new(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: Some(conversation_id.into()),
            text: Some(text.into()),
            role: None,
            extra: Map::new(),
        }
    }
}

/// Payload of `error` frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorData {
    /// Human-readable error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Fields this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Frame Parsing
// ============================================================================

/// Parsed WebSocket frame
#[derive(Debug, Clone, PartialEq)]
pub enum WsMessage {
    /// User text sent into a conversation (`type: "message"`)
    Message(ChatMessageData),
    /// Chat text pushed by the service (`type: "chat_message"`)
    ChatMessage(ChatMessageData),
    /// Error reported by the service (`type: "error"`)
    Error(ErrorData),
    /// Any other frame, kept as the raw JSON object
    Unknown(Value),
}

impl WsMessage {
    /// Build a `message` frame for a conversation
    pub fn message(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Message(ChatMessageData::new(conversation_id, text))
    }

    /// Build a frame of an arbitrary type
    ///
    /// Recognized types are decoded into their typed variant so that
    /// `WsMessage::other("chat_message", data)` equals the parsed form.
    pub fn other(msg_type: impl Into<String>, data: Value) -> Self {
        let mut object = Map::new();
        object.insert("type".to_string(), Value::String(msg_type.into()));
        object.insert("data".to_string(), data);
        Self::from_object(object)
    }

    /// Parse a raw JSON frame
    pub fn parse(json: &str) -> Result<Self, FrameError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| FrameError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Interpret an already-decoded JSON value as a frame
    pub fn from_value(value: Value) -> Result<Self, FrameError> {
        let Value::Object(object) = value else {
            return Err(FrameError::NotAnObject);
        };
        if !matches!(object.get("type"), Some(Value::String(_))) {
            return Err(FrameError::MissingType);
        }
        Ok(Self::from_object(object))
    }

    fn from_object(object: Map<String, Value>) -> Self {
        let known = object
            .get("type")
            .and_then(Value::as_str)
            .and_then(MessageType::from_wire);

        // Only `type` and `data` are modelled; anything else at the top level
        // would be lost by the typed variants.
        let is_plain = object.keys().all(|k| k == "type" || k == "data");

        if let (Some(kind), true, Some(data)) = (known, is_plain, object.get("data")) {
            let typed = match kind {
                MessageType::Message => decode_exact(data).map(Self::Message),
                MessageType::ChatMessage => decode_exact(data).map(Self::ChatMessage),
                MessageType::Error => decode_exact(data).map(Self::Error),
            };
            if let Some(msg) = typed {
                return msg;
            }
        }

        Self::Unknown(Value::Object(object))
    }

    /// The frame's `type` discriminator
    pub fn msg_type(&self) -> &str {
        match self {
            Self::Message(_) => MessageType::Message.as_str(),
            Self::ChatMessage(_) => MessageType::ChatMessage.as_str(),
            Self::Error(_) => MessageType::Error.as_str(),
            Self::Unknown(value) => value.get("type").and_then(Value::as_str).unwrap_or(""),
        }
    }

    /// Returns true if the frame type is modelled by this client
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Convert to the JSON object sent on the wire
    pub fn to_value(&self) -> Value {
        let (msg_type, data) = match self {
            Self::Message(data) => (MessageType::Message, serde_json::to_value(data)),
            Self::ChatMessage(data) => (MessageType::ChatMessage, serde_json::to_value(data)),
            Self::Error(data) => (MessageType::Error, serde_json::to_value(data)),
            Self::Unknown(value) => return value.clone(),
        };

        let mut object = Map::new();
        object.insert("type".to_string(), Value::String(msg_type.as_str().to_string()));
        // Payload structs only hold JSON-compatible fields
        object.insert("data".to_string(), data.unwrap_or(Value::Null));
        Value::Object(object)
    }

    /// Serialize to the text sent on the wire
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

/// Decode a payload only if re-encoding it yields the same JSON
///
/// Explicit nulls and similar shapes the payload structs cannot represent
/// make this return `None`, so the frame is kept verbatim instead.
fn decode_exact<T>(data: &Value) -> Option<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let typed: T = serde_json::from_value(data.clone()).ok()?;
    match serde_json::to_value(&typed) {
        Ok(ref encoded) if encoded == data => Some(typed),
        _ => None,
    }
}

impl Serialize for WsMessage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WsMessage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_chat_message() {
        let msg = WsMessage::parse(r#"{"type":"chat_message","data":{"text":"hi"}}"#).unwrap();
        match &msg {
            WsMessage::ChatMessage(data) => {
                assert_eq!(data.text.as_deref(), Some("hi"));
                assert!(data.conversation_id.is_none());
            }
            _ => panic!("Expected ChatMessage"),
        }
        assert_eq!(msg.to_value(), json!({"type":"chat_message","data":{"text":"hi"}}));
    }

    #[test]
    fn test_parse_keeps_unmodelled_fields() {
        let raw = json!({
            "type": "chat_message",
            "data": {"text": "hi", "role": "AI", "choices": ["yes", "no"]}
        });
        let msg = WsMessage::from_value(raw.clone()).unwrap();
        match &msg {
            WsMessage::ChatMessage(data) => {
                assert_eq!(data.role, Some(Role::Ai));
                assert!(data.extra.contains_key("choices"));
            }
            _ => panic!("Expected ChatMessage"),
        }
        assert_eq!(msg.to_value(), raw);
    }

    #[test]
    fn test_parse_unknown_type() {
        let raw = json!({"type": "typing", "data": {"active": true}});
        let msg = WsMessage::from_value(raw.clone()).unwrap();
        assert!(!msg.is_known());
        assert_eq!(msg.msg_type(), "typing");
        assert_eq!(msg.to_value(), raw);
    }

    #[test]
    fn test_known_type_with_unexpected_shape_falls_back() {
        let raw = json!({"type": "chat_message", "data": "plain string"});
        let msg = WsMessage::from_value(raw.clone()).unwrap();
        assert_eq!(msg, WsMessage::Unknown(raw));
    }

    #[test]
    fn test_explicit_nulls_are_preserved() {
        let raw = json!({"type": "chat_message", "data": {"text": null, "role": null}});
        let msg = WsMessage::from_value(raw.clone()).unwrap();
        assert_eq!(msg.msg_type(), "chat_message");
        assert!(!msg.is_known());
        assert_eq!(msg.to_value(), raw);

        let partial = json!({"type": "error", "data": {"message": "boom", "code": null}});
        let msg = WsMessage::from_value(partial.clone()).unwrap();
        assert!(msg.is_known());
        assert_eq!(msg.to_value(), partial);
    }

    #[test]
    fn test_extra_top_level_fields_fall_back() {
        let raw = json!({"type": "message", "data": {"text": "x"}, "seq": 4});
        let msg = WsMessage::from_value(raw.clone()).unwrap();
        assert_eq!(msg.to_value(), raw);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            WsMessage::parse(r#"{"type":"chat_mess"#),
            Err(FrameError::InvalidJson(_))
        ));
        assert_eq!(WsMessage::parse("[1,2]"), Err(FrameError::NotAnObject));
        assert_eq!(WsMessage::parse(r#"{"data":{}}"#), Err(FrameError::MissingType));
        assert_eq!(WsMessage::parse(r#"{"type":7}"#), Err(FrameError::MissingType));
    }

    #[test]
    fn test_message_builder() {
        let msg = WsMessage::message("conv_1", "Hello from WebSocket!");
        assert_eq!(
            msg.to_value(),
            json!({
                "type": "message",
                "data": {"conversation_id": "conv_1", "text": "Hello from WebSocket!"}
            })
        );
    }

    #[test]
    fn test_other_decodes_known_types() {
        let msg = WsMessage::other("error", json!({"message": "flow not found"}));
        match msg {
            WsMessage::Error(data) => assert_eq!(data.message.as_deref(), Some("flow not found")),
            _ => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_serde_impls_use_wire_form() {
        let msg = WsMessage::message("c1", "hey");
        let json = serde_json::to_string(&msg).unwrap();
        let back: WsMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
