//! # Static Price Oracle
//!
//! Serves the token table's reference prices, with per-symbol overrides.
//! Suitable for tests and for deployments that pin prices in config.

use crate::domain::errors::OracleError;
use crate::domain::tokens::token_table;
use crate::ports::outbound::PriceOracle;
use dashmap::DashMap;
use rust_decimal::Decimal;

pub struct StaticPriceOracle {
    prices: DashMap<String, Decimal>,
}

impl StaticPriceOracle {
    /// Oracle seeded with every token's reference price.
    pub fn new() -> Self {
        let prices = token_table()
            .iter()
            .map(|t| (t.symbol.to_string(), t.reference_price_usd))
            .collect();
        Self { prices }
    }

    /// Oracle with no prices at all.
    pub fn empty() -> Self {
        Self {
            prices: DashMap::new(),
        }
    }

    pub fn with_price(self, symbol: impl Into<String>, price: Decimal) -> Self {
        self.prices.insert(symbol.into(), price);
        self
    }

    pub fn set_price(&self, symbol: impl Into<String>, price: Decimal) {
        self.prices.insert(symbol.into(), price);
    }
}

impl Default for StaticPriceOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn price(&self, symbol: &str) -> Result<Decimal, OracleError> {
        self.prices
            .get(symbol)
            .map(|p| *p)
            .ok_or_else(|| OracleError::UnknownSymbol(symbol.to_string()))
    }
}
