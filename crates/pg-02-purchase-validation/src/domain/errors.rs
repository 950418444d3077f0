//! # Purchase Errors
//!
//! Business-rule rejections and infrastructure failures, kept apart so the
//! response layer can tell "your request is wrong" from "we cannot decide".

use rust_decimal::Decimal;
use thiserror::Error;

/// Business-rule rejection. The first failing rule wins.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PurchaseError {
    /// Body is not a JSON object with the purchase fields
    #[error("Malformed purchase body: {0}")]
    MalformedBody(String),

    #[error("Unknown token type: {0}")]
    InvalidTokenType(String),

    /// Not a finite number greater than zero
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Minimum purchase for {token} is {minimum} USD")]
    BelowMinimum { token: String, minimum: Decimal },

    #[error("Maximum purchase for {token} is {maximum} USD")]
    AboveMaximum { token: String, maximum: Decimal },

    #[error("Invalid wallet address")]
    InvalidWallet,

    #[error("Unsupported payment method: {0}")]
    UnsupportedPaymentMethod(String),

    #[error("Daily limit of {limit} USD exceeded: {current} USD already spent today, {requested} USD requested")]
    DailyLimitExceeded {
        limit: Decimal,
        current: Decimal,
        requested: Decimal,
    },
}

impl PurchaseError {
    pub fn kind(&self) -> &'static str {
        match self {
            PurchaseError::MalformedBody(_) => "malformed_body",
            PurchaseError::InvalidTokenType(_) => "invalid_token_type",
            PurchaseError::InvalidAmount(_) => "invalid_amount",
            PurchaseError::BelowMinimum { .. } => "below_minimum",
            PurchaseError::AboveMaximum { .. } => "above_maximum",
            PurchaseError::InvalidWallet => "invalid_wallet",
            PurchaseError::UnsupportedPaymentMethod(_) => "unsupported_payment_method",
            PurchaseError::DailyLimitExceeded { .. } => "daily_limit_exceeded",
        }
    }
}

/// External collaborator failed or timed out. Always fail-closed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InfrastructureError {
    #[error("Price oracle unavailable: {0}")]
    PriceOracleUnavailable(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl InfrastructureError {
    pub fn kind(&self) -> &'static str {
        match self {
            InfrastructureError::PriceOracleUnavailable(_) => "price_oracle_unavailable",
            InfrastructureError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

/// Outcome of a failed purchase validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Rejected(#[from] PurchaseError),

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Rejected(e) => e.kind(),
            ValidationError::Infrastructure(e) => e.kind(),
        }
    }
}

/// Price oracle port errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("No price for symbol {0}")]
    UnknownSymbol(String),

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

/// Daily-limit store port errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LimitStoreError {
    /// Atomic increment refused: it would cross the cap
    #[error("Daily cap reached: {current} USD already recorded")]
    LimitExceeded { current: Decimal },

    #[error("Limit store unavailable: {0}")]
    Unavailable(String),
}
