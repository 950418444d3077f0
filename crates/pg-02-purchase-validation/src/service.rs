//! # Purchase Validation Service
//!
//! Application service implementing [`PurchaseValidationApi`].
//!
//! ## Pipeline
//!
//! 1-6. Static rules ([`PurchaseRuleEngine`])
//! 7. Daily-limit pre-check
//! 8. Oracle price
//! 9. Token amount, rounded toward zero
//! 10. Atomic spend commit against the cap
//! 11. Transaction id
//!
//! Spend is written only at step 10, after every other check has passed.
//! Oracle and store calls are bounded by timeouts and fail closed.

use crate::domain::amount::token_quantity;
use crate::domain::entities::{PurchaseRequest, PurchaseResult};
use crate::domain::errors::{
    InfrastructureError, LimitStoreError, PurchaseError, ValidationError,
};
use crate::domain::rules::PurchaseRuleEngine;
use crate::domain::transaction_id::TransactionIdGenerator;
use crate::ports::inbound::PurchaseValidationApi;
use crate::ports::outbound::{DailyLimitStore, PriceOracle};
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use shared_types::{TimeSource, UnixMillis, WalletAddress};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Default per-wallet spend cap per UTC day, in USD.
pub const DEFAULT_DAILY_LIMIT_USD: Decimal = Decimal::ONE_THOUSAND;

/// Default bound on a single oracle or store call.
pub const DEFAULT_EXTERNAL_TIMEOUT: Duration = Duration::from_secs(2);

/// Tunables for the external half of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchasePolicy {
    pub daily_limit_usd: Decimal,
    pub oracle_timeout: Duration,
    pub store_timeout: Duration,
}

impl Default for PurchasePolicy {
    fn default() -> Self {
        Self {
            daily_limit_usd: DEFAULT_DAILY_LIMIT_USD,
            oracle_timeout: DEFAULT_EXTERNAL_TIMEOUT,
            store_timeout: DEFAULT_EXTERNAL_TIMEOUT,
        }
    }
}

/// UTC calendar date of an epoch-millisecond instant.
pub fn utc_date(now: UnixMillis) -> Option<NaiveDate> {
    let millis = i64::try_from(now).ok()?;
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

pub struct PurchaseValidationService<O: PriceOracle, L: DailyLimitStore> {
    rules: PurchaseRuleEngine,
    oracle: O,
    limits: L,
    ids: TransactionIdGenerator,
    policy: PurchasePolicy,
    time: Arc<dyn TimeSource>,
}

impl<O: PriceOracle, L: DailyLimitStore> PurchaseValidationService<O, L> {
    pub fn new(oracle: O, limits: L, policy: PurchasePolicy, time: Arc<dyn TimeSource>) -> Self {
        Self {
            rules: PurchaseRuleEngine::new(),
            oracle,
            limits,
            ids: TransactionIdGenerator::new(),
            policy,
            time,
        }
    }

    pub fn policy(&self) -> &PurchasePolicy {
        &self.policy
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn limits(&self) -> &L {
        &self.limits
    }

    async fn validate_inner(
        &self,
        wallet: WalletAddress,
        request: &PurchaseRequest,
    ) -> Result<PurchaseResult, ValidationError> {
        let bound = PurchaseRequest {
            wallet_address: wallet.to_hex(),
            ..request.clone()
        };
        let purchase = self.rules.validate(&bound)?;

        let today = utc_date(self.time.now())
            .ok_or_else(|| InfrastructureError::StoreUnavailable("clock out of range".into()))?;
        let limit = self.policy.daily_limit_usd;

        // 7. cheap rejection before the oracle is consulted
        let current = timeout(
            self.policy.store_timeout,
            self.limits.current_spend(&purchase.wallet, today),
        )
        .await
        .map_err(|_| InfrastructureError::StoreUnavailable("limit store timed out".into()))?
        .map_err(limit_store_error(limit, purchase.amount_usd))?;

        if current + purchase.amount_usd > limit {
            return Err(PurchaseError::DailyLimitExceeded {
                limit,
                current,
                requested: purchase.amount_usd,
            }
            .into());
        }

        // 8.
        let price = timeout(self.policy.oracle_timeout, self.oracle.price(purchase.token.symbol))
            .await
            .map_err(|_| InfrastructureError::PriceOracleUnavailable("price oracle timed out".into()))?
            .map_err(|e| InfrastructureError::PriceOracleUnavailable(e.to_string()))?;
        if price <= Decimal::ZERO {
            return Err(InfrastructureError::PriceOracleUnavailable(format!(
                "non-positive price {price} for {}",
                purchase.token.symbol
            ))
            .into());
        }

        // 9.
        // The amount already passed the bounds, so an unrepresentable
        // quantity can only come from the quote.
        let quantity = token_quantity(purchase.amount_usd, price, purchase.token.decimals)
            .ok_or_else(|| {
                InfrastructureError::PriceOracleUnavailable(format!(
                    "price {price} for {} yields an unrepresentable quantity",
                    purchase.token.symbol
                ))
            })?;
        if quantity.base_units == 0 {
            return Err(PurchaseError::InvalidAmount(purchase.amount_usd.to_string()).into());
        }
        debug!(
            token = purchase.token.symbol,
            price_usd = %price,
            token_amount = %quantity.token_amount,
            "Token amount computed"
        );

        // 10.
        let daily_spend_usd = timeout(
            self.policy.store_timeout,
            self.limits
                .record_spend(&purchase.wallet, today, purchase.amount_usd, limit),
        )
        .await
        .map_err(|_| InfrastructureError::StoreUnavailable("limit store timed out".into()))?
        .map_err(limit_store_error(limit, purchase.amount_usd))?;

        // 11.
        Ok(PurchaseResult {
            transaction_id: self.ids.next_id(),
            wallet: purchase.wallet,
            token: purchase.token,
            amount_usd: purchase.amount_usd,
            price_usd: price,
            quantity,
            payment_method: purchase.payment_method,
            daily_spend_usd,
        })
    }
}

fn limit_store_error(
    limit: Decimal,
    requested: Decimal,
) -> impl Fn(LimitStoreError) -> ValidationError {
    move |e| match e {
        LimitStoreError::LimitExceeded { current } => PurchaseError::DailyLimitExceeded {
            limit,
            current,
            requested,
        }
        .into(),
        LimitStoreError::Unavailable(msg) => InfrastructureError::StoreUnavailable(msg).into(),
    }
}

#[async_trait::async_trait]
impl<O: PriceOracle, L: DailyLimitStore> PurchaseValidationApi for PurchaseValidationService<O, L> {
    async fn validate_purchase(
        &self,
        wallet: WalletAddress,
        request: &PurchaseRequest,
    ) -> Result<PurchaseResult, ValidationError> {
        match self.validate_inner(wallet, request).await {
            Ok(result) => {
                info!(
                    wallet = %result.wallet,
                    token = result.token.symbol,
                    amount_usd = %result.amount_usd,
                    transaction_id = %result.transaction_id,
                    "Purchase validated"
                );
                Ok(result)
            }
            Err(ValidationError::Rejected(e)) => {
                warn!(wallet = %wallet, error = e.kind(), "Purchase rejected");
                Err(e.into())
            }
            Err(ValidationError::Infrastructure(e)) => {
                error!(wallet = %wallet, error = %e, "Purchase validation unavailable");
                Err(e.into())
            }
        }
    }
}
