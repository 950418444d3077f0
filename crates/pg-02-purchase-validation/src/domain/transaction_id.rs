//! # Transaction IDs
//!
//! UUID v7: 48-bit millisecond timestamp followed by random bits. Ids are
//! time-ordered for log correlation and collision-free in practice under
//! concurrent load.

use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

const PREFIX: &str = "txn_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Milliseconds since the Unix epoch encoded in the id.
    pub fn timestamp_ms(&self) -> u64 {
        let bytes = self.0.as_bytes();
        bytes[..6]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
    }

    /// Parse the `txn_<32 hex>` form.
    pub fn parse(s: &str) -> Option<Self> {
        let body = s.strip_prefix(PREFIX)?;
        Uuid::try_parse(body).ok().map(Self)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.0.simple())
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Issues one id per accepted purchase.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionIdGenerator;

impl TransactionIdGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn next_id(&self) -> TransactionId {
        TransactionId(Uuid::now_v7())
    }
}
