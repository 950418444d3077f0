//! # Domain Entities
//!
//! Purchase request, token configuration and the accepted-purchase record.

use super::transaction_id::TransactionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use shared_types::WalletAddress;
use std::fmt;

/// Static per-token pricing bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    pub symbol: &'static str,
    pub name: &'static str,
    /// Inclusive lower bound in USD
    pub minimum_usd: Decimal,
    /// Inclusive upper bound in USD
    pub maximum_usd: Decimal,
    /// Decimal exponent of the token's smallest unit (at most 18)
    pub decimals: u32,
    /// Reference price; production prices come from the oracle
    pub reference_price_usd: Decimal,
}

/// Inbound purchase fields.
///
/// `amount_usd` stays textual until the amount rule parses it, so JSON
/// numbers and strings take the same path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub token_type: String,
    #[serde(rename = "amountUSD", deserialize_with = "amount_from_number_or_string")]
    pub amount_usd: String,
    /// Filled from the verified wallet, never from the body
    #[serde(default)]
    pub wallet_address: String,
    pub payment_method: String,
}

fn amount_from_number_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawAmount::deserialize(d)? {
        RawAmount::Text(s) => s,
        RawAmount::Number(n) => n.to_string(),
    })
}

/// Accepted wallet payment methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    MetaMask,
    WalletConnect,
    Coinbase,
    Trust,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::MetaMask,
        PaymentMethod::WalletConnect,
        PaymentMethod::Coinbase,
        PaymentMethod::Trust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::MetaMask => "metamask",
            PaymentMethod::WalletConnect => "walletconnect",
            PaymentMethod::Coinbase => "coinbase",
            PaymentMethod::Trust => "trust",
        }
    }

    /// ASCII case-insensitive lookup in the allow-list.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that passed checks 1-6; nothing external consulted yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedPurchase {
    pub token: &'static TokenConfig,
    pub amount_usd: Decimal,
    pub wallet: WalletAddress,
    pub payment_method: PaymentMethod,
}

/// Token quantity for an accepted purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuantity {
    /// Rounded toward zero to the token's decimals
    pub token_amount: Decimal,
    /// `token_amount * 10^decimals`
    #[serde(with = "u128_as_string")]
    pub base_units: u128,
}

/// An accepted, sized purchase ready for the downstream execution step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResult {
    pub transaction_id: TransactionId,
    pub wallet: WalletAddress,
    pub token: &'static TokenConfig,
    #[serde(rename = "amountUSD")]
    pub amount_usd: Decimal,
    #[serde(rename = "priceUSD")]
    pub price_usd: Decimal,
    #[serde(flatten)]
    pub quantity: TokenQuantity,
    pub payment_method: PaymentMethod,
    /// Wallet's spend for the UTC day including this purchase
    #[serde(rename = "dailySpendUSD")]
    pub daily_spend_usd: Decimal,
}

impl PurchaseResult {
    pub fn token_amount(&self) -> Decimal {
        self.quantity.token_amount
    }
}

mod u128_as_string {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}
