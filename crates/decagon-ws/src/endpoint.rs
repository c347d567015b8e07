//! WebSocket endpoint URL construction

use crate::error::{WsError, WsResult};
use decagon_auth::AuthHeaders;
use std::fmt;
use tokio_tungstenite::tungstenite::http::Uri;

/// Path of the socket endpoint relative to the service base URL
pub const SOCKET_PATH: &str = "/ws";

/// Base URL of the conversation socket
///
/// Authentication travels in the query string, so every connect builds a new
/// URL from the base with [`SocketUrl::authenticated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketUrl {
    base: String,
}

impl SocketUrl {
    /// Use an explicit `ws://` or `wss://` URL
    pub fn new(url: impl Into<String>) -> WsResult<Self> {
        let base = url.into();
        let uri: Uri = base
            .parse()
            .map_err(|e| WsError::Configuration(format!("invalid socket URL {}: {}", base, e)))?;

        match uri.scheme_str() {
            Some("ws") | Some("wss") => {}
            other => {
                return Err(WsError::Configuration(format!(
                    "socket URL must use ws or wss, got {}",
                    other.unwrap_or("no scheme")
                )))
            }
        }
        if uri.host().is_none() {
            return Err(WsError::Configuration(format!("socket URL {} has no host", base)));
        }

        Ok(Self { base })
    }

    /// Derive the socket URL from the REST base URL
    ///
    /// `https` maps to `wss`, `http` to `ws`, and [`SOCKET_PATH`] is appended.
    pub fn from_base_url(base_url: &str) -> WsResult<Self> {
        let socket = if let Some(rest) = base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            return Err(WsError::Configuration(format!(
                "base_url must use http or https: {}",
                base_url
            )));
        };

        Self::new(format!("{}{}", socket.trim_end_matches('/'), SOCKET_PATH))
    }

    /// The URL without credentials
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Full URL for one connect: base plus `user_id`, `team_id`,
    /// `signature`, `epoch` and, when non-empty, `conversation_id`
    pub fn authenticated(
        &self,
        headers: &AuthHeaders,
        conversation_id: Option<&str>,
    ) -> WsResult<String> {
        let mut pairs = headers.query_pairs().to_vec();
        if let Some(id) = conversation_id.filter(|id| !id.is_empty()) {
            pairs.push(("conversation_id", id));
        }

        let query = serde_urlencoded::to_string(&pairs)
            .map_err(|e| WsError::Configuration(format!("cannot encode query: {}", e)))?;
        let separator = if self.base.contains('?') { '&' } else { '?' };

        Ok(format!("{}{}{}", self.base, separator, query))
    }
}

impl fmt::Display for SocketUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
