//! Credential generator
//!
//! Implements HMAC-SHA256 signing as required by the Decagon auth headers.
//!
//! # Security
//!
//! The shared secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::clock::{Clock, SystemClock};
use crate::credential::{Credential, CREDENTIAL_TTL_SECS};
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Derives signed credentials from a shared secret
///
/// A fresh [`Credential`] is minted on every call; nothing is cached.
///
/// # Example
///
/// ```
/// use decagon_auth::{CredentialGenerator, FixedClock};
/// use std::sync::Arc;
///
/// let generator = CredentialGenerator::new("my-private-key")
///     .with_clock(Arc::new(FixedClock::new(1_700_000_000)));
///
/// let credential = generator.generate("user123").unwrap();
/// assert_eq!(credential.expiry(), 1_700_000_000 + 86_400);
/// assert_eq!(credential.signature().len(), 64);
/// ```
#[derive(Clone)]
pub struct CredentialGenerator {
    /// Shared secret (zeroized on drop)
    secret: Arc<SecretString>,
    /// Wall clock
    clock: Arc<dyn Clock>,
}

impl CredentialGenerator {
    /// Create a generator for the given shared secret
    ///
    /// An empty secret is accepted here and reported as a configuration
    /// error on first use.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::new(SecretString::from(secret.into())),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a different clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns true if a non-empty secret is configured
    pub fn has_secret(&self) -> bool {
        !self.secret.expose_secret().is_empty()
    }

    /// Mint a credential for `subject_id` valid for 24 hours from now
    ///
    /// # Errors
    /// - [`AuthError::InvalidInput`] if `subject_id` is empty
    /// - [`AuthError::Configuration`] if the shared secret is empty
    pub fn generate(&self, subject_id: &str) -> AuthResult<Credential> {
        self.generate_at(subject_id, self.clock.now_unix())
    }

    /// Mint a credential as if the current unix time were `now`
    #[instrument(skip(self), level = "debug")]
    pub fn generate_at(&self, subject_id: &str, now: i64) -> AuthResult<Credential> {
        if subject_id.is_empty() {
            return Err(AuthError::empty("subject_id"));
        }

        let expiry = now + CREDENTIAL_TTL_SECS;
        let signature = self.sign(subject_id, expiry)?;

        debug!(expiry, "Derived credential");

        Ok(Credential::new(subject_id.to_string(), expiry, signature))
    }

    /// Compute the signature for a subject and expiry
    ///
    /// Signature algorithm:
    /// 1. message = subject_id + decimal(expiry), no separator
    /// 2. HMAC-SHA256(secret, message)
    /// 3. Lowercase hex encode
    pub fn sign(&self, subject_id: &str, expiry: i64) -> AuthResult<String> {
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            return Err(AuthError::Configuration(
                "shared secret must not be empty".to_string(),
            ));
        }

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AuthError::Configuration(format!("unusable shared secret: {}", e)))?;
        mac.update(subject_id.as_bytes());
        mac.update(expiry.to_string().as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for CredentialGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialGenerator")
            .field("secret", &"[REDACTED]")
            .field("clock", &self.clock)
            .finish()
    }
}
