//! # Session Issuer
//!
//! Mints opaque bearer tokens. Binding to a wallet and expiry is the
//! [`SessionStore`](crate::ports::outbound::SessionStore)'s job.

use super::entities::SessionToken;
use rand::rngs::OsRng;
use rand::RngCore;

/// Session token entropy in bytes (256 bits).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Default session lifetime: one hour.
pub const DEFAULT_SESSION_TTL_MS: u64 = 60 * 60 * 1000;

/// Generate a 256-bit token from the OS CSPRNG, lower-case hex.
pub fn generate_session_token() -> SessionToken {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    SessionToken::new(hex::encode(bytes))
}
