//! # Amount Arithmetic
//!
//! USD parsing and token sizing. Token amounts are rounded toward zero to
//! the token's smallest unit, so a buyer is never credited more than paid for.

use super::entities::TokenQuantity;
use super::tokens::MAX_TOKEN_DECIMALS;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a USD amount. Accepts plain and scientific notation.
///
/// Returns `None` for anything that is not a finite number strictly
/// greater than zero, and for inputs a `Decimal` cannot hold exactly:
/// `Decimal::from_str` rounds past 28 fractional digits, which would let
/// an amount just under a bound round onto it.
pub fn parse_usd(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value = match trimmed.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => scale_by_exponent(parse_exact(mantissa)?, exponent)?,
        None => parse_exact(trimmed)?,
    };

    (value > Decimal::ZERO).then_some(value)
}

/// Plain decimal notation, rejected if any significant digit would be lost.
fn parse_exact(raw: &str) -> Option<Decimal> {
    let value = Decimal::from_str(raw).ok()?;
    let significant_fraction = raw
        .split_once('.')
        .map(|(_, fraction)| fraction.trim_end_matches('0').len())
        .unwrap_or(0);
    (value.normalize().scale() as usize == significant_fraction).then_some(value)
}

/// `mantissa × 10^exponent`, moving the scale instead of multiplying so
/// nothing is rounded.
fn scale_by_exponent(mantissa: Decimal, exponent: &str) -> Option<Decimal> {
    let exponent: i64 = exponent.parse().ok()?;
    let scale = i64::from(mantissa.scale()).checked_sub(exponent)?;
    if scale >= 0 {
        let scale = u32::try_from(scale).ok()?;
        Decimal::try_from_i128_with_scale(mantissa.mantissa(), scale).ok()
    } else {
        let shift = u32::try_from(-scale).ok()?;
        let digits = mantissa.mantissa().checked_mul(10i128.checked_pow(shift)?)?;
        Decimal::try_from_i128_with_scale(digits, 0).ok()
    }
}

/// `amount_usd / price_usd` rounded down to `decimals`, plus base units.
///
/// `None` on non-positive price, arithmetic overflow, or unsupported decimals.
pub fn token_quantity(amount_usd: Decimal, price_usd: Decimal, decimals: u32) -> Option<TokenQuantity> {
    if price_usd <= Decimal::ZERO || decimals > MAX_TOKEN_DECIMALS {
        return None;
    }

    let token_amount = amount_usd
        .checked_div(price_usd)?
        .round_dp_with_strategy(decimals, RoundingStrategy::ToZero)
        .normalize();

    let unit = Decimal::from_i128_with_scale(10i128.pow(decimals), 0);
    let base_units = token_amount.checked_mul(unit)?.trunc().to_u128()?;

    Some(TokenQuantity {
        token_amount,
        base_units,
    })
}
