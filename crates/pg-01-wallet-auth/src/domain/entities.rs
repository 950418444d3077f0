//! # Domain Entities
//!
//! Core data structures for wallet authentication.

use super::errors::{AuthError, SignatureError};
use serde::{Deserialize, Serialize};
use shared_types::{UnixMillis, WalletAddress};
use std::fmt;

// =============================================================================
// Signature Types (secp256k1)
// =============================================================================

/// Ethereum-style recoverable ECDSA signature, `r ‖ s ‖ v` on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EthSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl EthSignature {
    pub const LEN: usize = 65;

    /// Parse a 65-byte hex signature, `0x` prefix optional.
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        if body.len() != Self::LEN * 2 {
            return Err(SignatureError::MalformedSignature("expected 65 bytes"));
        }
        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|_| SignatureError::MalformedSignature("invalid hex"))?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn from_bytes(bytes: &[u8; Self::LEN]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self { r, s, v: bytes[64] }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// `0x`-prefixed lower-case hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

// =============================================================================
// Request / Result Types
// =============================================================================

/// Stage-1 credentials, one per inbound request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// Claimed wallet, `0x` + 40 hex (any case)
    pub wallet_address: String,
    /// 65-byte hex signature
    pub signature: String,
    /// The signed message, as the wallet displayed it
    pub message: String,
    /// Client timestamp in epoch milliseconds
    pub timestamp: UnixMillis,
}

/// Opaque bearer credential handed out after a successful login.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Never print the secret in logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "SessionToken({prefix}…)")
    }
}

/// A session bound to a wallet with an explicit expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGrant {
    pub token: SessionToken,
    pub wallet: WalletAddress,
    pub expires_at: UnixMillis,
}

/// Result of the authentication stage.
#[derive(Clone, Debug)]
pub struct AuthResult {
    /// Whether authentication succeeded
    pub success: bool,
    /// Lower-case verified wallet (success only)
    pub verified_address: Option<WalletAddress>,
    /// Session issued for the wallet (success only)
    pub session: Option<SessionGrant>,
    /// Failure reason
    pub error: Option<AuthError>,
}

impl AuthResult {
    pub fn authenticated(session: SessionGrant) -> Self {
        Self {
            success: true,
            verified_address: Some(session.wallet),
            session: Some(session),
            error: None,
        }
    }

    pub fn rejected(error: AuthError) -> Self {
        Self {
            success: false,
            verified_address: None,
            session: None,
            error: Some(error),
        }
    }

    /// Collapse into a `Result` for `?`-style callers.
    pub fn into_result(self) -> Result<SessionGrant, AuthError> {
        match (self.session, self.error) {
            (Some(session), None) => Ok(session),
            (_, Some(error)) => Err(error),
            (None, None) => Err(AuthError::StoreUnavailable(
                "authentication produced no session".into(),
            )),
        }
    }
}
