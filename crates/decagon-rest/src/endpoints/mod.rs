//! API endpoint implementations

pub mod chat;
pub mod conversation;
pub mod csat;

pub use chat::ChatEndpoints;
pub use conversation::ConversationEndpoints;
pub use csat::CsatEndpoints;
