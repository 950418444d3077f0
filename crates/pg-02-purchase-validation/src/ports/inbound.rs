//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::{PurchaseRequest, PurchaseResult};
use crate::domain::errors::ValidationError;
use shared_types::WalletAddress;

/// Purchase validation for an already-authenticated wallet.
#[async_trait::async_trait]
pub trait PurchaseValidationApi: Send + Sync {
    /// Validate, price and size a purchase for `wallet`.
    ///
    /// The request's own `wallet_address` is ignored; `wallet` is the
    /// address verified by the authentication stage.
    ///
    /// On success the spend has been recorded against the wallet's daily
    /// cap and a transaction id assigned.
    async fn validate_purchase(
        &self,
        wallet: WalletAddress,
        request: &PurchaseRequest,
    ) -> Result<PurchaseResult, ValidationError>;
}
