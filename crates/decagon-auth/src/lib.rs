//! Credential derivation for the Decagon API
//!
//! Every request to the service carries a short-lived credential derived
//! locally from the team's shared secret, without a server round-trip:
//!
//! ```text
//! expiry    = now + 24h
//! signature = hex(HMAC-SHA256(secret, subject_id + expiry))
//! ```
//!
//! # Example
//!
//! ```
//! use decagon_auth::{Authenticator, CredentialGenerator};
//!
//! let generator = CredentialGenerator::new("your-private-key");
//! let auth = Authenticator::new(generator, "your-team-id");
//!
//! // Fresh headers for a single request
//! let headers = auth.authenticate("user123").unwrap();
//! for (name, value) in headers.header_pairs() {
//!     println!("{}: {}", name, value);
//! }
//! ```

mod clock;
mod credential;
mod error;
mod generator;
mod headers;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credential::{Credential, CREDENTIAL_TTL_SECS};
pub use error::{AuthError, AuthResult};
pub use generator::CredentialGenerator;
pub use headers::{
    AuthHeaders, Authenticator, HEADER_EPOCH, HEADER_SIGNATURE, HEADER_TEAM_ID, HEADER_USER_ID,
};
