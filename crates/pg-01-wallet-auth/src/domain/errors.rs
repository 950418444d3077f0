//! # Authentication Errors
//!
//! Error types for the signature and authentication stage.

use shared_types::{UnixMillis, WalletAddress};
use thiserror::Error;

/// Errors from personal-message signature verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Wrong length, bad hex, out-of-range scalar, high S, or bad recovery id
    #[error("Malformed signature: {0}")]
    MalformedSignature(&'static str),

    /// Well-formed signature from which no public key can be recovered
    #[error("Failed to recover public key")]
    RecoveryFailure,

    /// Recovery succeeded but the signer is not the claimed wallet
    #[error("Signer mismatch: claimed {claimed}, recovered {recovered}")]
    SignatureMismatch {
        claimed: WalletAddress,
        recovered: WalletAddress,
    },
}

/// Session store failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session expired")]
    Expired,

    #[error("Unknown session")]
    Unknown,

    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Nonce (consumed-signature) store failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NonceError {
    #[error("Signature already used")]
    AlreadyUsed,

    #[error("Nonce store unavailable: {0}")]
    Unavailable(String),
}

/// Errors of the authentication stage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// A required auth header is absent or unreadable
    #[error("Missing or unreadable authentication header: {0}")]
    MissingHeaders(&'static str),

    /// Claimed wallet is not `0x` + 40 hex characters
    #[error("Malformed wallet address")]
    MalformedAddress,

    /// Timestamp outside the freshness window
    #[error("Timestamp {timestamp} is outside the {window_ms} ms window around {now}")]
    ExpiredTimestamp {
        timestamp: UnixMillis,
        now: UnixMillis,
        window_ms: u64,
    },

    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Same signature presented twice inside its freshness window
    #[error("Signature has already been used")]
    ReplayedSignature,

    #[error("Session expired")]
    SessionExpired,

    #[error("Unknown session token")]
    SessionUnknown,

    /// Nonce or session store failed or timed out
    #[error("Authentication store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AuthError {
    /// Stable snake_case identifier for responses and audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingHeaders(_) => "missing_headers",
            AuthError::MalformedAddress => "malformed_address",
            AuthError::ExpiredTimestamp { .. } => "expired_timestamp",
            AuthError::Signature(SignatureError::MalformedSignature(_)) => "malformed_signature",
            AuthError::Signature(SignatureError::RecoveryFailure) => "recovery_failure",
            AuthError::Signature(SignatureError::SignatureMismatch { .. }) => "signature_mismatch",
            AuthError::ReplayedSignature => "replayed_signature",
            AuthError::SessionExpired => "session_expired",
            AuthError::SessionUnknown => "session_unknown",
            AuthError::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// True when the failure is about external state, not the caller's input.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, AuthError::StoreUnavailable(_))
    }
}

impl From<SessionError> for AuthError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Expired => AuthError::SessionExpired,
            SessionError::Unknown => AuthError::SessionUnknown,
            SessionError::Unavailable(msg) => AuthError::StoreUnavailable(msg),
        }
    }
}

impl From<NonceError> for AuthError {
    fn from(e: NonceError) -> Self {
        match e {
            NonceError::AlreadyUsed => AuthError::ReplayedSignature,
            NonceError::Unavailable(msg) => AuthError::StoreUnavailable(msg),
        }
    }
}
