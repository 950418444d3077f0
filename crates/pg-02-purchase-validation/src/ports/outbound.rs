//! # Outbound Ports (Driven Ports / SPI)
//!
//! External collaborators. Callers bound every call with a timeout and treat
//! any error as a rejection.

use crate::domain::errors::{LimitStoreError, OracleError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared_types::WalletAddress;

/// Current USD price per token symbol.
#[async_trait::async_trait]
pub trait PriceOracle: Send + Sync {
    async fn price(&self, symbol: &str) -> Result<Decimal, OracleError>;
}

/// Cumulative per-wallet spend for one UTC day.
#[async_trait::async_trait]
pub trait DailyLimitStore: Send + Sync {
    /// Spend already recorded for `wallet` on `date`. Zero when none.
    async fn current_spend(
        &self,
        wallet: &WalletAddress,
        date: NaiveDate,
    ) -> Result<Decimal, LimitStoreError>;

    /// Atomically add `amount` unless the total would exceed `limit`.
    ///
    /// Returns the new total.
    ///
    /// # Errors
    /// * `LimitStoreError::LimitExceeded` - nothing recorded, carries the current total
    /// * `LimitStoreError::Unavailable` - backing store failed
    async fn record_spend(
        &self,
        wallet: &WalletAddress,
        date: NaiveDate,
        amount: Decimal,
        limit: Decimal,
    ) -> Result<Decimal, LimitStoreError>;
}
