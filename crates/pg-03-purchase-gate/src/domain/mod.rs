//! Domain layer - gate configuration, error taxonomy and audit records.

pub mod audit;
pub mod config;
pub mod error;
pub mod request_id;
