//! # Audit Events
//!
//! One event per handled request, success or failure.

use super::error::GateError;
use super::request_id::RequestId;
use serde::Serialize;
use serde_json::Value;
use shared_types::{UnixMillis, WalletAddress};
use std::fmt;

/// Which stage produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Auth,
    Purchase,
}

/// Audit event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuditEventKind {
    #[serde(rename = "auth.login")]
    AuthLogin,
    #[serde(rename = "auth.failed")]
    AuthFailed,
    #[serde(rename = "purchase.validated")]
    PurchaseValidated,
    #[serde(rename = "purchase.rejected")]
    PurchaseRejected,
    #[serde(rename = "purchase.unavailable")]
    PurchaseUnavailable,
    #[serde(rename = "gate.internal_error")]
    InternalError,
}

impl AuditEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventKind::AuthLogin => "auth.login",
            AuditEventKind::AuthFailed => "auth.failed",
            AuditEventKind::PurchaseValidated => "purchase.validated",
            AuditEventKind::PurchaseRejected => "purchase.rejected",
            AuditEventKind::PurchaseUnavailable => "purchase.unavailable",
            AuditEventKind::InternalError => "gate.internal_error",
        }
    }

    /// Event for a failure raised in `stage`.
    pub fn for_failure(stage: Stage, error: &GateError) -> Self {
        match (stage, error) {
            (_, GateError::Internal(_)) => AuditEventKind::InternalError,
            (Stage::Auth, _) => AuditEventKind::AuthFailed,
            (Stage::Purchase, e) if e.is_infrastructure() => AuditEventKind::PurchaseUnavailable,
            (Stage::Purchase, _) => AuditEventKind::PurchaseRejected,
        }
    }
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Rejected,
    Unavailable,
    Error,
}

impl AuditOutcome {
    pub fn of(error: &GateError) -> Self {
        match error {
            GateError::Internal(_) => AuditOutcome::Error,
            e if e.is_infrastructure() => AuditOutcome::Unavailable,
            _ => AuditOutcome::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Rejected => "rejected",
            AuditOutcome::Unavailable => "unavailable",
            AuditOutcome::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    pub event: AuditEventKind,
    pub request_id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletAddress>,
    pub outcome: AuditOutcome,
    /// Event-specific fields
    pub detail: Value,
    pub timestamp_ms: UnixMillis,
}

impl AuditEvent {
    pub fn success(
        event: AuditEventKind,
        request_id: RequestId,
        wallet: WalletAddress,
        detail: Value,
        timestamp_ms: UnixMillis,
    ) -> Self {
        Self {
            event,
            request_id,
            wallet: Some(wallet),
            outcome: AuditOutcome::Success,
            detail,
            timestamp_ms,
        }
    }

    pub fn failure(
        stage: Stage,
        error: &GateError,
        request_id: RequestId,
        wallet: Option<WalletAddress>,
        timestamp_ms: UnixMillis,
    ) -> Self {
        let mut detail = serde_json::json!({
            "error": error.kind(),
            "message": error.to_string(),
        });
        if let (Some(extra), Some(map)) = (error.details(), detail.as_object_mut()) {
            map.insert("details".into(), extra);
        }
        Self {
            event: AuditEventKind::for_failure(stage, error),
            request_id,
            wallet,
            outcome: AuditOutcome::of(error),
            detail,
            timestamp_ms,
        }
    }
}
