//! Role and message type enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a conversation entry
///
/// Values the service adds later decode into [`Role::Other`] with the wire
/// string kept as sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Generated by the AI agent
    Ai,
    /// Written by a human support agent
    Agent,
    /// Written by the end user
    User,
    /// Any role this client does not model
    Other(String),
}

impl Role {
    /// Returns the role name as used in API messages
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ai => "AI",
            Self::Agent => "AGENT",
            Self::User => "USER",
            Self::Other(role) => role.as_str(),
        }
    }

    /// Returns true if the entry was produced on the service side
    pub fn is_responder(&self) -> bool {
        matches!(self, Self::Ai | Self::Agent)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "AI" => Self::Ai,
            "AGENT" => Self::Agent,
            "USER" => Self::User,
            _ => Self::Other(role),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized values of the WebSocket `type` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// User text sent into a conversation
    Message,
    /// Chat text pushed by the service
    ChatMessage,
    /// Error reported by the service
    Error,
}

impl MessageType {
    /// Returns the discriminator as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::ChatMessage => "chat_message",
            Self::Error => "error",
        }
    }

    /// Look up a wire discriminator, `None` for types this client does not model
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "message" => Some(Self::Message),
            "chat_message" => Some(Self::ChatMessage),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
