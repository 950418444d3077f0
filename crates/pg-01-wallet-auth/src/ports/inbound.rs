//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::{AuthRequest, AuthResult, SessionGrant};
use crate::domain::errors::AuthError;
use shared_types::WalletAddress;

/// Wallet authentication API.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait::async_trait]
pub trait WalletAuthApi: Send + Sync {
    /// Verify signature and freshness, then consume the signature.
    ///
    /// Issues nothing: a caller that still has work to do before the login
    /// counts (a purchase) opens the session afterwards.
    async fn verify(&self, request: &AuthRequest) -> Result<WalletAddress, AuthError>;

    /// Issue a session for a wallet returned by [`verify`](Self::verify).
    async fn open_session(&self, wallet: WalletAddress) -> Result<SessionGrant, AuthError>;

    /// Login: [`verify`](Self::verify) then [`open_session`](Self::open_session).
    async fn authenticate(&self, request: &AuthRequest) -> AuthResult {
        let wallet = match self.verify(request).await {
            Ok(wallet) => wallet,
            Err(error) => return AuthResult::rejected(error),
        };
        match self.open_session(wallet).await {
            Ok(grant) => AuthResult::authenticated(grant),
            Err(error) => AuthResult::rejected(error),
        }
    }

    /// Resolve a previously issued session token to its wallet.
    async fn resume_session(&self, token: &str) -> Result<WalletAddress, AuthError>;
}
