//! Adapters layer - audit sinks.

pub mod memory_audit;
pub mod tracing_audit;

pub use memory_audit::MemoryAuditSink;
pub use tracing_audit::{TracingAuditSink, AUDIT_TARGET};
