//! Composition root for a single-process gate backed by in-memory stores.

use crate::adapters::TracingAuditSink;
use crate::domain::config::GateConfig;
use crate::ports::outbound::AuditSink;
use crate::service::PurchaseGate;
use pg_01_wallet_auth::{InMemoryNonceStore, InMemorySessionStore, ReplayGuard, WalletAuthService};
use pg_02_purchase_validation::{
    InMemoryDailyLimitStore, PriceOracle, PurchaseValidationService, StaticPriceOracle,
};
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::Arc;

pub type MemoryAuthService = WalletAuthService<InMemoryNonceStore, InMemorySessionStore>;

pub type MemoryPurchaseService<O> = PurchaseValidationService<O, InMemoryDailyLimitStore>;

/// Gate over in-memory stores and the static reference-price oracle.
pub type InMemoryGate = PurchaseGate<MemoryAuthService, MemoryPurchaseService<StaticPriceOracle>>;

/// Gate over in-memory stores with the given price oracle.
pub fn build_gate<O: PriceOracle>(
    config: &GateConfig,
    oracle: O,
    time: Arc<dyn TimeSource>,
    audit: Arc<dyn AuditSink>,
) -> PurchaseGate<MemoryAuthService, MemoryPurchaseService<O>> {
    let auth = WalletAuthService::new(
        ReplayGuard::new(config.auth.replay_window_ms),
        InMemoryNonceStore::new(),
        InMemorySessionStore::with_ttl(time.clone(), config.auth.session_ttl_ms()),
        time.clone(),
    )
    .with_store_timeout(config.auth.store_timeout);

    let purchases = PurchaseValidationService::new(
        oracle,
        InMemoryDailyLimitStore::new(),
        config.purchase.policy(),
        time.clone(),
    );

    PurchaseGate::new(auth, purchases, audit, time)
}

pub fn in_memory_gate(
    config: &GateConfig,
    time: Arc<dyn TimeSource>,
    audit: Arc<dyn AuditSink>,
) -> InMemoryGate {
    build_gate(config, StaticPriceOracle::new(), time, audit)
}

/// System clock and `tracing` audit output.
pub fn default_gate(config: &GateConfig) -> InMemoryGate {
    in_memory_gate(
        config,
        Arc::new(SystemTimeSource),
        Arc::new(TracingAuditSink::new()),
    )
}
