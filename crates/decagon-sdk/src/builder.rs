//! Client Builder Pattern
//!
//! Collects the three required settings (`base_url`, `team_id`, shared
//! secret) plus optional tuning, validates them, and assembles a
//! [`SessionClient`].
//!
//! # Example
//!
//! ```
//! use decagon_sdk::builder::SessionClientBuilder;
//! use std::time::Duration;
//!
//! let client = SessionClientBuilder::new("https://api.decagon.ai", "team_42", "private-key")
//!     .with_request_timeout(Duration::from_secs(15))
//!     .with_socket_url("wss://chat.decagon.ai/ws")
//!     .build()
//!     .unwrap();
//! assert_eq!(client.team_id(), "team_42");
//! ```

use crate::client::SessionClient;
use crate::error::{SdkError, SdkResult};
use decagon_auth::{Authenticator, Clock, CredentialGenerator};
use decagon_rest::{ClientConfig, DecagonRestClient, HttpTransport};
use decagon_ws::{Connection, ConnectionConfig, Connector, SocketUrl};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Default REST request timeout
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default WebSocket handshake timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for configuring a [`SessionClient`]
///
/// An empty secret is accepted here and reported as a configuration error
/// by the first operation that needs a credential.
pub struct SessionClientBuilder {
    base_url: String,
    team_id: String,
    generator: CredentialGenerator,
    socket_url: Option<String>,
    request_timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
    http_transport: Option<Arc<dyn HttpTransport>>,
    connector: Option<Arc<dyn Connector>>,
}

impl SessionClientBuilder {
    /// Create a builder with the required settings
    pub fn new(
        base_url: impl Into<String>,
        team_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            team_id: team_id.into(),
            generator: CredentialGenerator::new(secret),
            socket_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
            http_transport: None,
            connector: None,
        }
    }

    /// Use an explicit socket URL instead of deriving it from `base_url`
    pub fn with_socket_url(mut self, url: impl Into<String>) -> Self {
        self.socket_url = Some(url.into());
        self
    }

    /// Set the REST request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the WebSocket handshake timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the REST user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Read time from a custom clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.generator = self.generator.with_clock(clock);
        self
    }

    /// Send REST requests through a custom transport
    pub fn with_http_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.http_transport = Some(transport);
        self
    }

    /// Open sockets through a custom connector
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Validate the configuration
    ///
    /// `base_url` must be an http(s) URL, `team_id` must be non-empty and an
    /// explicit socket URL must be ws(s).
    pub fn validate(&self) -> SdkResult<SocketUrl> {
        if self.team_id.is_empty() {
            return Err(SdkError::Configuration("team_id must not be empty".to_string()));
        }

        let derived = SocketUrl::from_base_url(&self.base_url)?;
        match &self.socket_url {
            Some(url) => Ok(SocketUrl::new(url.as_str())?),
            None => Ok(derived),
        }
    }

    /// Validate and build the client
    pub fn build(self) -> SdkResult<SessionClient> {
        let socket_url = self.validate()?;
        let authenticator = Authenticator::new(self.generator, self.team_id);

        let rest = match self.http_transport {
            Some(transport) => DecagonRestClient::with_transport(transport, authenticator.clone()),
            None => {
                let mut config = ClientConfig::new(self.base_url.as_str())
                    .with_timeout(self.request_timeout);
                if let Some(user_agent) = self.user_agent {
                    config = config.with_user_agent(user_agent);
                }
                DecagonRestClient::new(config, authenticator.clone())?
            }
        };

        let config = ConnectionConfig::new(socket_url).with_timeout(self.connect_timeout);
        let connection = match self.connector {
            Some(connector) => Connection::with_connector(config, connector),
            None => Connection::new(config),
        };

        info!(
            base_url = %self.base_url,
            socket_url = %connection.socket_url(),
            team_id = authenticator.team_id(),
            "Created Decagon session client"
        );

        Ok(SessionClient::from_parts(rest, authenticator, connection))
    }
}

impl fmt::Debug for SessionClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClientBuilder")
            .field("base_url", &self.base_url)
            .field("team_id", &self.team_id)
            .field("generator", &self.generator)
            .field("socket_url", &self.socket_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .field("http_transport", &self.http_transport.as_ref().map(|_| "..."))
            .field("connector", &self.connector.as_ref().map(|_| "..."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decagon_types::ErrorKind;

    #[test]
    fn test_socket_url_derived() {
        let builder = SessionClientBuilder::new("https://api.decagon.ai", "team", "secret");
        assert_eq!(builder.validate().unwrap().as_str(), "wss://api.decagon.ai/ws");

        let builder = SessionClientBuilder::new("http://localhost:3000/", "team", "secret");
        assert_eq!(builder.validate().unwrap().as_str(), "ws://localhost:3000/ws");
    }

    #[test]
    fn test_explicit_socket_url() {
        let builder = SessionClientBuilder::new("https://api.decagon.ai", "team", "secret")
            .with_socket_url("wss://chat.decagon.ai/socket");
        assert_eq!(
            builder.validate().unwrap().as_str(),
            "wss://chat.decagon.ai/socket"
        );

        let err = SessionClientBuilder::new("https://api.decagon.ai", "team", "secret")
            .with_socket_url("https://chat.decagon.ai")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_validation_errors() {
        let err = SessionClientBuilder::new("https://api.decagon.ai", "", "secret")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("team_id"));

        let err = SessionClientBuilder::new("api.decagon.ai", "team", "secret")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_empty_secret_is_deferred() {
        let client = SessionClientBuilder::new("https://api.decagon.ai", "team", "").build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let builder = SessionClientBuilder::new("https://api.decagon.ai", "team", "hunter2");
        let debug = format!("{:?}", builder);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("team"));
    }
}
