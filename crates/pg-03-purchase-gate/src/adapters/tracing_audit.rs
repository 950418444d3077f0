//! Audit events as structured `tracing` records.

use crate::domain::audit::{AuditEvent, AuditOutcome};
use crate::ports::outbound::AuditSink;
use tracing::{info, warn};

/// `tracing` target for audit records, so they can be routed separately.
pub const AUDIT_TARGET: &str = "purchase_gate::audit";

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        let wallet = event
            .wallet
            .map(|w| w.to_hex())
            .unwrap_or_default();

        match event.outcome {
            AuditOutcome::Success => info!(
                target: AUDIT_TARGET,
                event = event.event.as_str(),
                request_id = %event.request_id,
                wallet = %wallet,
                outcome = event.outcome.as_str(),
                detail = %event.detail,
                timestamp_ms = event.timestamp_ms,
                "audit"
            ),
            _ => warn!(
                target: AUDIT_TARGET,
                event = event.event.as_str(),
                request_id = %event.request_id,
                wallet = %wallet,
                outcome = event.outcome.as_str(),
                detail = %event.detail,
                timestamp_ms = event.timestamp_ms,
                "audit"
            ),
        }
    }
}
