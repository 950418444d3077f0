//! # Outbound Ports (Driven Ports / SPI)
//!
//! Shared mutable state used across concurrently handled requests. Both
//! stores must be atomic per key.

use crate::domain::entities::SessionGrant;
use crate::domain::errors::{NonceError, SessionError};
use shared_types::{Hash, UnixMillis, WalletAddress};

/// Record of consumed signatures.
#[async_trait::async_trait]
pub trait NonceStore: Send + Sync {
    /// Atomically mark `key` as consumed until `expires_at`.
    ///
    /// # Errors
    /// * `NonceError::AlreadyUsed` - key is present and not yet expired at `now`
    /// * `NonceError::Unavailable` - backing store failed
    async fn consume(
        &self,
        key: Hash,
        expires_at: UnixMillis,
        now: UnixMillis,
    ) -> Result<(), NonceError>;
}

/// Session persistence bound to wallets, with expiry.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Mint and persist a session for `wallet`.
    async fn issue(&self, wallet: WalletAddress) -> Result<SessionGrant, SessionError>;

    /// Look up a token.
    ///
    /// # Errors
    /// * `SessionError::Expired` - token known but past its expiry
    /// * `SessionError::Unknown` - token never issued (or already purged)
    async fn validate(&self, token: &str) -> Result<WalletAddress, SessionError>;
}
