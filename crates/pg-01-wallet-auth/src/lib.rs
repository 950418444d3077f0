//! # Wallet Authentication Subsystem (PG-01)
//!
//! Authenticates a caller by an Ethereum personal-message signature over a
//! challenge, rejects stale or reused signatures, and issues a session bound
//! to the verified wallet.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure cryptographic and window logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Adapters Layer** (`adapters/`): In-memory nonce and session stores
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: Signatures with high S values are rejected
//! - **Replay**: a signature is accepted once, and only inside its 300 s window
//! - **Fail-Closed**: store errors and timeouts reject the login

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{InMemoryNonceStore, InMemorySessionStore};
pub use domain::entities::{AuthRequest, AuthResult, EthSignature, SessionGrant, SessionToken};
pub use domain::errors::{AuthError, NonceError, SessionError, SignatureError};
pub use domain::replay::{ReplayGuard, DEFAULT_REPLAY_WINDOW_MS};
pub use domain::session::{generate_session_token, DEFAULT_SESSION_TTL_MS};
pub use domain::signature::{
    address_from_pubkey, keccak256, personal_message_hash, sign_personal_message,
    SignatureVerifier,
};
pub use ports::inbound::WalletAuthApi;
pub use ports::outbound::{NonceStore, SessionStore};
pub use service::{WalletAuthService, DEFAULT_STORE_TIMEOUT};
