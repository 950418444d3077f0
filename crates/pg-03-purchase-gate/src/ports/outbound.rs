//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::audit::AuditEvent;

/// Destination for audit events.
///
/// Called exactly once per handled request. Implementations must not
/// block for long and must not panic.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}
