//! # In-Memory Session Store
//!
//! Sessions bound to the verified wallet, with an explicit expiry.
//!
//! Expired entries are removed when their token is presented, and swept
//! from `issue` at most once per TTL, so the map holds at most two TTLs'
//! worth of logins.

use crate::domain::entities::SessionGrant;
use crate::domain::errors::SessionError;
use crate::domain::session::{generate_session_token, DEFAULT_SESSION_TTL_MS};
use crate::ports::outbound::SessionStore;
use dashmap::DashMap;
use shared_types::{TimeSource, UnixMillis, WalletAddress};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    wallet: WalletAddress,
    expires_at: UnixMillis,
}

pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionEntry>,
    ttl_ms: u64,
    time: Arc<dyn TimeSource>,
    next_sweep_at: AtomicU64,
}

impl InMemorySessionStore {
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        Self::with_ttl(time, DEFAULT_SESSION_TTL_MS)
    }

    pub fn with_ttl(time: Arc<dyn TimeSource>, ttl_ms: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl_ms,
            time,
            next_sweep_at: AtomicU64::new(0),
        }
    }

    /// Remove sessions past their expiry.
    pub fn purge_expired(&self) {
        let now = self.time.now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.expires_at > now);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, "Purged expired sessions");
        }
    }

    /// One caller per sweep period wins the swap and purges.
    fn sweep_if_due(&self, now: UnixMillis) {
        let due = self.next_sweep_at.load(Ordering::Acquire);
        if now < due {
            return;
        }
        let next = now.saturating_add(self.ttl_ms.max(1));
        if self
            .next_sweep_at
            .compare_exchange(due, next, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.purge_expired();
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn issue(&self, wallet: WalletAddress) -> Result<SessionGrant, SessionError> {
        let now = self.time.now();
        self.sweep_if_due(now);

        let token = generate_session_token();
        let expires_at = now.saturating_add(self.ttl_ms);

        self.sessions.insert(
            token.as_str().to_string(),
            SessionEntry { wallet, expires_at },
        );
        debug!(wallet = %wallet, expires_at, "Session issued");

        Ok(SessionGrant {
            token,
            wallet,
            expires_at,
        })
    }

    async fn validate(&self, token: &str) -> Result<WalletAddress, SessionError> {
        let now = self.time.now();
        let entry = match self.sessions.get(token) {
            Some(entry) => *entry,
            None => return Err(SessionError::Unknown),
        };

        if entry.expires_at <= now {
            self.sessions.remove(token);
            return Err(SessionError::Expired);
        }

        Ok(entry.wallet)
    }
}
