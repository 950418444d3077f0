//! # Purchase Validation Subsystem (PG-02)
//!
//! Validates a token purchase for an authenticated wallet against the token
//! table, the payment allow-list and a per-wallet daily spend cap, then
//! prices and sizes it.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Token table, rule engine, amount arithmetic, transaction ids
//! - **Ports Layer** (`ports/`): `PurchaseValidationApi`, `PriceOracle`, `DailyLimitStore`
//! - **Adapters Layer** (`adapters/`): Static oracle and in-memory limit store
//! - **Service Layer** (`service.rs`): The full pipeline with timeouts
//!
//! ## Money
//!
//! All USD values are `rust_decimal::Decimal`. Token amounts are rounded
//! toward zero at the token's decimal exponent.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{InMemoryDailyLimitStore, StaticPriceOracle};
pub use domain::amount::{parse_usd, token_quantity};
pub use domain::entities::{
    PaymentMethod, PurchaseRequest, PurchaseResult, TokenConfig, TokenQuantity, ValidatedPurchase,
};
pub use domain::errors::{
    InfrastructureError, LimitStoreError, OracleError, PurchaseError, ValidationError,
};
pub use domain::rules::PurchaseRuleEngine;
pub use domain::tokens::{lookup_token, token_table, MAX_TOKEN_DECIMALS};
pub use domain::transaction_id::{TransactionId, TransactionIdGenerator};
pub use ports::inbound::PurchaseValidationApi;
pub use ports::outbound::{DailyLimitStore, PriceOracle};
pub use service::{
    utc_date, PurchasePolicy, PurchaseValidationService, DEFAULT_DAILY_LIMIT_USD,
    DEFAULT_EXTERNAL_TIMEOUT,
};
