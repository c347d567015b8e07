//! Signed, time-bounded credentials

use std::fmt;

/// Lifetime of a credential in seconds (24 hours)
pub const CREDENTIAL_TTL_SECS: i64 = 24 * 60 * 60;

/// Signed proof of identity for one subject
///
/// Minted by [`CredentialGenerator`](crate::CredentialGenerator) for a single
/// request or connection setup and dropped afterwards. It is intentionally
/// not `Clone`: every request mints its own.
#[derive(PartialEq, Eq)]
pub struct Credential {
    subject_id: String,
    expiry: i64,
    signature: String,
}

impl Credential {
    pub(crate) fn new(subject_id: String, expiry: i64, signature: String) -> Self {
        Self {
            subject_id,
            expiry,
            signature,
        }
    }

    /// The subject this credential was minted for
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Expiry as unix seconds
    pub fn expiry(&self) -> i64 {
        self.expiry
    }

    /// Lowercase hex HMAC-SHA256 signature
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns true if the credential is past its expiry at `now` (unix seconds)
    ///
    /// Informational only. The SDK never checks this before use since it
    /// never holds on to a credential.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expiry
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("subject_id", &self.subject_id)
            .field("expiry", &self.expiry)
            .field(
                "signature",
                &format!("{}...", &self.signature[..8.min(self.signature.len())]),
            )
            .finish()
    }
}
