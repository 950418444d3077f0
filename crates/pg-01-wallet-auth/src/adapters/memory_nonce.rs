//! # In-Memory Nonce Store
//!
//! Anti-replay set of consumed signature keys.
//!
//! - Entries live until the end of the signature's freshness window
//! - `DashMap::entry` holds the shard lock across check-and-insert, so two
//!   concurrent identical requests cannot both succeed
//! - Expired entries are swept every `SWEEP_INTERVAL` insertions

use crate::domain::errors::NonceError;
use crate::ports::outbound::NonceStore;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{Hash, UnixMillis};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

const SWEEP_INTERVAL: u64 = 1024;

/// Statistics for the nonce store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonceStoreStats {
    pub total_checked: u64,
    pub replays_detected: u64,
    pub live_entries: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryNonceStore {
    seen: DashMap<Hash, UnixMillis>,
    total_checked: AtomicU64,
    replays_detected: AtomicU64,
}

impl InMemoryNonceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry whose window closed before `now`.
    pub fn purge_expired(&self, now: UnixMillis) {
        let before = self.seen.len();
        self.seen.retain(|_, expires_at| *expires_at >= now);
        let removed = before.saturating_sub(self.seen.len());
        if removed > 0 {
            debug!(removed, "Purged expired nonces");
        }
    }

    pub fn stats(&self) -> NonceStoreStats {
        NonceStoreStats {
            total_checked: self.total_checked.load(Ordering::Relaxed),
            replays_detected: self.replays_detected.load(Ordering::Relaxed),
            live_entries: self.seen.len(),
        }
    }

    fn consume_sync(
        &self,
        key: Hash,
        expires_at: UnixMillis,
        now: UnixMillis,
    ) -> Result<(), NonceError> {
        let checked = self.total_checked.fetch_add(1, Ordering::Relaxed) + 1;

        let result = match self.seen.entry(key) {
            Entry::Occupied(mut entry) => {
                if *entry.get() >= now {
                    self.replays_detected.fetch_add(1, Ordering::Relaxed);
                    Err(NonceError::AlreadyUsed)
                } else {
                    entry.insert(expires_at);
                    Ok(())
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(expires_at);
                Ok(())
            }
        };

        if checked % SWEEP_INTERVAL == 0 {
            self.purge_expired(now);
        }

        result
    }
}

#[async_trait::async_trait]
impl NonceStore for InMemoryNonceStore {
    async fn consume(
        &self,
        key: Hash,
        expires_at: UnixMillis,
        now: UnixMillis,
    ) -> Result<(), NonceError> {
        self.consume_sync(key, expires_at, now)
    }
}
