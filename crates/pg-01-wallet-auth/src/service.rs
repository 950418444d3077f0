//! # Wallet Authentication Service
//!
//! Application service implementing [`WalletAuthApi`].
//!
//! ## Order of checks
//!
//! 1. Claimed wallet shape
//! 2. Timestamp freshness (cheap, rejects stale replays before any crypto)
//! 3. Signature recovery and comparison
//! 4. Consume the signature in the nonce store
//! 5. Issue the session ([`WalletAuthApi::open_session`], separate call)
//!
//! Nothing is written to either store until steps 1-3 have passed, and no
//! session exists until the nonce has been consumed.
//!
//! The nonce is consumed before the session store is called, so two
//! concurrent copies of one signature cannot both end up holding a session.
//! The cost: if the session store then fails or times out, the signature is
//! already spent and the wallet has to sign a fresh challenge.

use crate::domain::entities::{AuthRequest, EthSignature, SessionGrant};
use crate::domain::errors::AuthError;
use crate::domain::replay::ReplayGuard;
use crate::domain::signature::verify_personal_signature;
use crate::ports::inbound::WalletAuthApi;
use crate::ports::outbound::{NonceStore, SessionStore};
use shared_types::{TimeSource, WalletAddress};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default bound on a single nonce/session store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct WalletAuthService<N: NonceStore, S: SessionStore> {
    guard: ReplayGuard,
    nonces: N,
    sessions: S,
    time: Arc<dyn TimeSource>,
    store_timeout: Duration,
}

impl<N: NonceStore, S: SessionStore> WalletAuthService<N, S> {
    pub fn new(guard: ReplayGuard, nonces: N, sessions: S, time: Arc<dyn TimeSource>) -> Self {
        Self {
            guard,
            nonces,
            sessions,
            time,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn nonces(&self) -> &N {
        &self.nonces
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    async fn verify_inner(&self, request: &AuthRequest) -> Result<WalletAddress, AuthError> {
        let claimed = WalletAddress::parse(&request.wallet_address)
            .map_err(|_| AuthError::MalformedAddress)?;

        let now = self.time.now();
        self.guard.check_freshness(now, request.timestamp)?;

        let signature = EthSignature::from_hex(&request.signature)?;
        let verified = verify_personal_signature(request.message.as_bytes(), &signature, &claimed)?;
        debug!(wallet = %verified, "Signature verified");

        let key = ReplayGuard::nonce_key(&signature);
        let expires_at = self.guard.nonce_expiry(request.timestamp);
        timeout(self.store_timeout, self.nonces.consume(key, expires_at, now))
            .await
            .map_err(|_| AuthError::StoreUnavailable("nonce store timed out".into()))??;

        Ok(verified)
    }
}

#[async_trait::async_trait]
impl<N: NonceStore, S: SessionStore> WalletAuthApi for WalletAuthService<N, S> {
    async fn verify(&self, request: &AuthRequest) -> Result<WalletAddress, AuthError> {
        self.verify_inner(request).await.inspect_err(|error| {
            warn!(
                wallet = %request.wallet_address,
                error = error.kind(),
                "Wallet authentication rejected"
            );
        })
    }

    async fn open_session(&self, wallet: WalletAddress) -> Result<SessionGrant, AuthError> {
        let grant = timeout(self.store_timeout, self.sessions.issue(wallet))
            .await
            .map_err(|_| AuthError::StoreUnavailable("session store timed out".into()))
            .and_then(|issued| issued.map_err(AuthError::from))
            .inspect_err(|error| {
                warn!(wallet = %wallet, error = error.kind(), "Session not issued");
            })?;
        Ok(grant)
    }

    async fn resume_session(&self, token: &str) -> Result<WalletAddress, AuthError> {
        let wallet = timeout(self.store_timeout, self.sessions.validate(token))
            .await
            .map_err(|_| AuthError::StoreUnavailable("session store timed out".into()))??;
        Ok(wallet)
    }
}
