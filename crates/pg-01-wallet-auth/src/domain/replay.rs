//! # Replay Guard
//!
//! Freshness window on the client timestamp plus the key under which a
//! consumed signature is remembered until that window closes.

use super::entities::EthSignature;
use super::errors::AuthError;
use super::signature::keccak256;
use shared_types::{Hash, UnixMillis};

/// Maximum accepted distance between server time and request timestamp.
pub const DEFAULT_REPLAY_WINDOW_MS: u64 = 300_000;

/// Timestamp-window check. Stateless; the consumed-signature set lives in a
/// [`NonceStore`](crate::ports::outbound::NonceStore).
#[derive(Debug, Clone, Copy)]
pub struct ReplayGuard {
    window_ms: u64,
}

impl Default for ReplayGuard {
    fn default() -> Self {
        Self::new(DEFAULT_REPLAY_WINDOW_MS)
    }
}

impl ReplayGuard {
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Accept iff `|now - timestamp| <= window` (inclusive, both directions).
    pub fn check_freshness(&self, now: UnixMillis, timestamp: UnixMillis) -> Result<(), AuthError> {
        if now.abs_diff(timestamp) > self.window_ms {
            return Err(AuthError::ExpiredTimestamp {
                timestamp,
                now,
                window_ms: self.window_ms,
            });
        }
        Ok(())
    }

    /// Key under which a consumed signature is recorded.
    pub fn nonce_key(signature: &EthSignature) -> Hash {
        keccak256(&signature.to_bytes())
    }

    /// Last instant at which a request with `timestamp` could still be fresh.
    pub fn nonce_expiry(&self, timestamp: UnixMillis) -> UnixMillis {
        timestamp.saturating_add(self.window_ms)
    }
}
