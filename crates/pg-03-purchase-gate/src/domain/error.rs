//! Gate error taxonomy and its HTTP mapping.
//!
//! | Family | Status |
//! |---|---|
//! | Auth | 401 |
//! | Purchase | 400 |
//! | Infrastructure (incl. auth stores) | 503 |
//! | Internal | 500 |

use http::StatusCode;
use pg_01_wallet_auth::{AuthError, SignatureError};
use pg_02_purchase_validation::{
    token_table, InfrastructureError, PaymentMethod, PurchaseError, ValidationError,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Every failure the gate can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Purchase(#[from] PurchaseError),

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    /// Unexpected fault inside the gate itself
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for GateError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::Rejected(e) => GateError::Purchase(e),
            ValidationError::Infrastructure(e) => GateError::Infrastructure(e),
        }
    }
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::Auth(e) if e.is_infrastructure() => StatusCode::SERVICE_UNAVAILABLE,
            GateError::Auth(_) => StatusCode::UNAUTHORIZED,
            GateError::Purchase(_) => StatusCode::BAD_REQUEST,
            GateError::Infrastructure(_) => StatusCode::SERVICE_UNAVAILABLE,
            GateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable snake_case identifier, the `error` field of the body.
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Auth(e) => e.kind(),
            GateError::Purchase(e) => e.kind(),
            GateError::Infrastructure(e) => e.kind(),
            GateError::Internal(_) => "internal_error",
        }
    }

    pub fn is_infrastructure(&self) -> bool {
        match self {
            GateError::Auth(e) => e.is_infrastructure(),
            GateError::Infrastructure(_) => true,
            _ => false,
        }
    }

    /// Caller-facing text. Internal faults are not described.
    pub fn public_message(&self) -> String {
        match self {
            GateError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }

    /// Structured context for the `details` field, when there is any.
    pub fn details(&self) -> Option<Value> {
        match self {
            GateError::Auth(e) => auth_details(e),
            GateError::Purchase(e) => purchase_details(e),
            GateError::Infrastructure(_) | GateError::Internal(_) => None,
        }
    }
}

fn auth_details(e: &AuthError) -> Option<Value> {
    match e {
        AuthError::MissingHeaders(header) => Some(json!({ "header": header })),
        AuthError::ExpiredTimestamp {
            timestamp,
            now,
            window_ms,
        } => Some(json!({
            "timestamp": timestamp,
            "serverTime": now,
            "windowMs": window_ms,
        })),
        AuthError::Signature(SignatureError::MalformedSignature(reason)) => {
            Some(json!({ "reason": reason }))
        }
        AuthError::Signature(SignatureError::SignatureMismatch { claimed, .. }) => {
            Some(json!({ "claimed": claimed }))
        }
        _ => None,
    }
}

fn purchase_details(e: &PurchaseError) -> Option<Value> {
    match e {
        PurchaseError::MalformedBody(reason) => Some(json!({ "reason": reason })),
        PurchaseError::InvalidTokenType(symbol) => Some(json!({
            "tokenType": symbol,
            "supported": token_table().iter().map(|t| t.symbol).collect::<Vec<_>>(),
        })),
        PurchaseError::BelowMinimum { token, minimum } => {
            Some(json!({ "token": token, "minimumUSD": minimum }))
        }
        PurchaseError::AboveMaximum { token, maximum } => {
            Some(json!({ "token": token, "maximumUSD": maximum }))
        }
        PurchaseError::UnsupportedPaymentMethod(method) => Some(json!({
            "paymentMethod": method,
            "supported": PaymentMethod::ALL.iter().map(|m| m.as_str()).collect::<Vec<_>>(),
        })),
        PurchaseError::DailyLimitExceeded {
            limit,
            current,
            requested,
        } => Some(json!({
            "limitUSD": limit,
            "currentUSD": current,
            "requestedUSD": requested,
        })),
        PurchaseError::InvalidAmount(_) | PurchaseError::InvalidWallet => None,
    }
}

/// JSON error body: `{error, message, details?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&GateError> for ErrorBody {
    fn from(e: &GateError) -> Self {
        Self {
            error: e.kind(),
            message: e.public_message(),
            details: e.details(),
        }
    }
}
