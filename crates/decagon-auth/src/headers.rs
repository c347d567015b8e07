//! Per-request authentication values
//!
//! [`Authenticator`] turns a subject id into an [`AuthHeaders`] value that is
//! attached to exactly one REST request or one WebSocket handshake. Nothing
//! is stored on a shared client, so concurrent requests never observe each
//! other's headers.

use crate::credential::Credential;
use crate::error::{AuthError, AuthResult};
use crate::generator::CredentialGenerator;
use tracing::instrument;

/// Header carrying the subject id
pub const HEADER_USER_ID: &str = "X-AUTH-USER-ID";
/// Header carrying the team id
pub const HEADER_TEAM_ID: &str = "X-AUTH-TEAM-ID";
/// Header carrying the hex signature
pub const HEADER_SIGNATURE: &str = "X-AUTH-SIGNATURE";
/// Header carrying the expiry (decimal unix seconds)
pub const HEADER_EPOCH: &str = "X-AUTH-EPOCH";

/// The four auth values for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    user_id: String,
    team_id: String,
    signature: String,
    epoch: String,
}

impl AuthHeaders {
    /// Build the header set from a freshly minted credential
    pub fn new(credential: Credential, team_id: impl Into<String>) -> Self {
        Self {
            user_id: credential.subject_id().to_string(),
            team_id: team_id.into(),
            signature: credential.signature().to_string(),
            epoch: credential.expiry().to_string(),
        }
    }

    /// Subject id
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Team id
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// Lowercase hex signature
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Expiry as a decimal string
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Header name/value pairs for an HTTP request
    pub fn header_pairs(&self) -> [(&'static str, &str); 4] {
        [
            (HEADER_USER_ID, &self.user_id),
            (HEADER_TEAM_ID, &self.team_id),
            (HEADER_SIGNATURE, &self.signature),
            (HEADER_EPOCH, &self.epoch),
        ]
    }

    /// The same values under the WebSocket query parameter names
    pub fn query_pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("user_id", &self.user_id),
            ("team_id", &self.team_id),
            ("signature", &self.signature),
            ("epoch", &self.epoch),
        ]
    }
}

/// Mints [`AuthHeaders`] for one team
#[derive(Debug, Clone)]
pub struct Authenticator {
    generator: CredentialGenerator,
    team_id: String,
}

impl Authenticator {
    /// Create an authenticator for a team
    pub fn new(generator: CredentialGenerator, team_id: impl Into<String>) -> Self {
        Self {
            generator,
            team_id: team_id.into(),
        }
    }

    /// The configured team id
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// The underlying credential generator
    pub fn generator(&self) -> &CredentialGenerator {
        &self.generator
    }

    /// Mint a fresh header set for `subject_id`
    ///
    /// Called once per request; the result must not be reused.
    #[instrument(skip(self), level = "debug")]
    pub fn authenticate(&self, subject_id: &str) -> AuthResult<AuthHeaders> {
        if self.team_id.is_empty() {
            return Err(AuthError::Configuration("team_id must not be empty".to_string()));
        }
        let credential = self.generator.generate(subject_id)?;
        Ok(AuthHeaders::new(credential, self.team_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use std::sync::Arc;

    fn authenticator(clock: Arc<FixedClock>) -> Authenticator {
        let generator = CredentialGenerator::new("secret").with_clock(clock);
        Authenticator::new(generator, "team_42")
    }

    #[test]
    fn test_header_names_are_exact() {
        let auth = authenticator(Arc::new(FixedClock::new(100)));
        let headers = auth.authenticate("user123").unwrap();
        let names: Vec<_> = headers.header_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            ["X-AUTH-USER-ID", "X-AUTH-TEAM-ID", "X-AUTH-SIGNATURE", "X-AUTH-EPOCH"]
        );
    }

    #[test]
    fn test_header_values() {
        let clock = Arc::new(FixedClock::new(100));
        let auth = authenticator(clock);
        let headers = auth.authenticate("user123").unwrap();

        let expected = auth.generator().sign("user123", 86_500).unwrap();
        assert_eq!(headers.user_id(), "user123");
        assert_eq!(headers.team_id(), "team_42");
        assert_eq!(headers.epoch(), "86500");
        assert_eq!(headers.signature(), expected);
    }

    #[test]
    fn test_query_pairs_mirror_headers() {
        let auth = authenticator(Arc::new(FixedClock::new(100)));
        let headers = auth.authenticate("user123").unwrap();
        let query = headers.query_pairs();
        assert_eq!(query[0], ("user_id", "user123"));
        assert_eq!(query[1], ("team_id", "team_42"));
        assert_eq!(query[3], ("epoch", "86500"));
    }

    #[test]
    fn test_fresh_headers_per_call() {
        let clock = Arc::new(FixedClock::new(100));
        let auth = authenticator(clock.clone());
        let first = auth.authenticate("user123").unwrap();
        clock.advance(1);
        let second = auth.authenticate("user123").unwrap();
        assert_ne!(first.epoch(), second.epoch());
        assert_ne!(first.signature(), second.signature());
    }

    #[test]
    fn test_empty_team_is_configuration_error() {
        let generator = CredentialGenerator::new("secret");
        let auth = Authenticator::new(generator, "");
        assert!(matches!(
            auth.authenticate("user123"),
            Err(AuthError::Configuration(_))
        ));
    }
}
