//! Shared wire types for the Decagon conversational AI API
//!
//! This crate provides the core type definitions used across the Decagon SDK.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Role`] - Author of a conversation entry (AI, agent or user)
//! - [`WsMessage`] - Parsed WebSocket frame, tagged by its `type` field
//! - [`ChatMessageData`], [`ErrorData`] - Payloads of the recognized frame types
//! - [`ErrorKind`] - Error taxonomy shared by every crate in the workspace

pub mod enums;
pub mod error;
pub mod messages;

// Re-export commonly used types
pub use enums::*;
pub use error::*;
pub use messages::*;

// Re-export serde_json so callers can build metadata without an extra dependency
pub use serde_json::{Map, Value};
