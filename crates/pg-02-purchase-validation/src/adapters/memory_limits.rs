//! # In-Memory Daily Limit Store
//!
//! Per `(wallet, UTC date)` running totals. The DashMap entry lock makes
//! check-and-increment atomic per key, so two concurrent purchases cannot
//! both slip under the cap.
//!
//! The first record of a new UTC day drops totals older than the day
//! before it. Yesterday is kept for requests straddling midnight.

use crate::domain::errors::LimitStoreError;
use crate::ports::outbound::DailyLimitStore;
use chrono::{Datelike, NaiveDate};
use dashmap::DashMap;
use rust_decimal::Decimal;
use shared_types::WalletAddress;
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::debug;

#[derive(Default)]
pub struct InMemoryDailyLimitStore {
    totals: DashMap<(WalletAddress, NaiveDate), Decimal>,
    /// Latest day seen, as days from the common era.
    latest_day: AtomicI32,
}

impl InMemoryDailyLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop totals for days before `date`.
    pub fn purge_before(&self, date: NaiveDate) -> usize {
        let before = self.totals.len();
        self.totals.retain(|(_, day), _| *day >= date);
        before - self.totals.len()
    }

    fn sweep_on_new_day(&self, date: NaiveDate) {
        let day = date.num_days_from_ce();
        let previous = self.latest_day.fetch_max(day, Ordering::AcqRel);
        if previous >= day {
            return;
        }
        if let Some(yesterday) = date.pred_opt() {
            let removed = self.purge_before(yesterday);
            if removed > 0 {
                debug!(removed, %date, "Purged daily totals");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

#[async_trait::async_trait]
impl DailyLimitStore for InMemoryDailyLimitStore {
    async fn current_spend(
        &self,
        wallet: &WalletAddress,
        date: NaiveDate,
    ) -> Result<Decimal, LimitStoreError> {
        Ok(self
            .totals
            .get(&(*wallet, date))
            .map(|total| *total)
            .unwrap_or(Decimal::ZERO))
    }

    async fn record_spend(
        &self,
        wallet: &WalletAddress,
        date: NaiveDate,
        amount: Decimal,
        limit: Decimal,
    ) -> Result<Decimal, LimitStoreError> {
        // Before the entry lock: retain needs every shard
        self.sweep_on_new_day(date);

        let mut total = self.totals.entry((*wallet, date)).or_insert(Decimal::ZERO);
        let next = total
            .checked_add(amount)
            .ok_or_else(|| LimitStoreError::Unavailable("spend total overflow".into()))?;
        if next > limit {
            return Err(LimitStoreError::LimitExceeded { current: *total });
        }
        *total = next;
        Ok(next)
    }
}
