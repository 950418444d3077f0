//! Ports layer - the audit trail is the gate's only outbound port of its own.

pub mod outbound;
