//! # Purchase Rule Engine
//!
//! The six static checks, in the order callers see them. The first failing
//! check decides the error; nothing here touches external state.

use super::amount::parse_usd;
use super::entities::{PaymentMethod, PurchaseRequest, ValidatedPurchase};
use super::errors::PurchaseError;
use super::tokens::lookup_token;
use shared_types::WalletAddress;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct PurchaseRuleEngine;

impl PurchaseRuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run checks 1-6.
    ///
    /// 1. token symbol known
    /// 2. amount is a number > 0
    /// 3. amount >= token minimum
    /// 4. amount <= token maximum
    /// 5. wallet is `0x` + 40 hex
    /// 6. payment method in the allow-list
    pub fn validate(&self, request: &PurchaseRequest) -> Result<ValidatedPurchase, PurchaseError> {
        let token = lookup_token(&request.token_type)
            .ok_or_else(|| PurchaseError::InvalidTokenType(request.token_type.clone()))?;

        let amount_usd = parse_usd(&request.amount_usd)
            .ok_or_else(|| PurchaseError::InvalidAmount(request.amount_usd.clone()))?;

        if amount_usd < token.minimum_usd {
            return Err(PurchaseError::BelowMinimum {
                token: token.name.to_string(),
                minimum: token.minimum_usd,
            });
        }
        if amount_usd > token.maximum_usd {
            return Err(PurchaseError::AboveMaximum {
                token: token.name.to_string(),
                maximum: token.maximum_usd,
            });
        }

        let wallet = WalletAddress::parse(&request.wallet_address)
            .map_err(|_| PurchaseError::InvalidWallet)?;

        let payment_method = PaymentMethod::parse(&request.payment_method).ok_or_else(|| {
            PurchaseError::UnsupportedPaymentMethod(request.payment_method.clone())
        })?;

        debug!(
            token = token.symbol,
            amount_usd = %amount_usd,
            wallet = %wallet,
            payment_method = %payment_method,
            "Static purchase checks passed"
        );

        Ok(ValidatedPurchase {
            token,
            amount_usd,
            wallet,
            payment_method,
        })
    }
}
