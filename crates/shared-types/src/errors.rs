//! # Error Types
//!
//! Errors raised while parsing shared primitives.

use thiserror::Error;

/// Errors produced when parsing a wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Address does not start with `0x`.
    #[error("address must start with 0x")]
    MissingPrefix,

    /// Address body is not exactly 40 hex characters.
    #[error("address must be 40 hex characters, got {0}")]
    InvalidLength(usize),

    /// Address body contains a non-hex character.
    #[error("address contains non-hex characters")]
    InvalidHex,
}
