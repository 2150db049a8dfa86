//! Conversions from human token quantities to base units.
//!
//! Native amounts use [`STANDARD_DECIMALS`]; custom tokens may use up to
//! [`MAX_DECIMALS`]. Parsed fractions are truncated, never rounded.

use crate::error::{ChainError, Result};
use primitive_types::U256;

pub const STANDARD_DECIMALS: u8 = 9;
pub const MAX_DECIMALS: u8 = 18;

/// Base units in one whole native token.
pub fn units_per_token() -> U256 {
    U256::exp10(STANDARD_DECIMALS as usize)
}

/// Whole native tokens as base units.
pub fn tokens(amount: u64) -> U256 {
    U256::from(amount) * units_per_token()
}

/// Base units as-is.
pub fn wei(amount: u64) -> U256 {
    U256::from(amount)
}

/// Parses a decimal native token amount such as `"0.005"`.
pub fn tokens_decimal(amount: &str) -> Result<U256> {
    tokens_with_decimals(amount, STANDARD_DECIMALS)
}

/// Parses a decimal amount for a token with `decimals` fractional digits.
///
/// Digits beyond `decimals` are dropped: `"1.23456"` at 2 decimals is 123.
pub fn tokens_with_decimals(amount: &str, decimals: u8) -> Result<U256> {
    if decimals > MAX_DECIMALS {
        return Err(ChainError::Validation(format!(
            "Decimals must be between 0 and {}, got: {}",
            MAX_DECIMALS, decimals
        )));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        return Err(ChainError::Validation(format!(
            "Invalid token amount: {:?}",
            amount
        )));
    }

    let decimals = decimals as usize;
    let kept = &fraction[..fraction.len().min(decimals)];
    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(decimals - kept.len()));

    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(trimmed)
        .map_err(|e| ChainError::Validation(format!("Token amount {:?} out of range: {:?}", amount, e)))
}
