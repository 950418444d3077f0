//! # Token Table
//!
//! Fixed symbol table, built once on first use and shared for the life of
//! the process.

use super::entities::TokenConfig;
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Highest supported token decimal exponent.
pub const MAX_TOKEN_DECIMALS: u32 = 18;

static TOKENS: OnceLock<[TokenConfig; 2]> = OnceLock::new();

/// All purchasable tokens.
pub fn token_table() -> &'static [TokenConfig] {
    TOKENS.get_or_init(|| {
        [
            TokenConfig {
                symbol: "GUARD",
                name: "Guard Token",
                minimum_usd: Decimal::new(5, 3),
                maximum_usd: Decimal::new(10_000, 0),
                decimals: 18,
                reference_price_usd: Decimal::new(10, 2),
            },
            TokenConfig {
                symbol: "SHIELD",
                name: "Shield Token",
                minimum_usd: Decimal::new(25, 3),
                maximum_usd: Decimal::new(50_000, 0),
                decimals: 18,
                reference_price_usd: Decimal::new(50, 2),
            },
        ]
    })
}

/// Exact, case-sensitive symbol lookup.
pub fn lookup_token(symbol: &str) -> Option<&'static TokenConfig> {
    token_table().iter().find(|t| t.symbol == symbol)
}
