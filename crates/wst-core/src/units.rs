//! Ether / wei conversion for user-facing amounts.

use alloy_primitives::U256;
use alloy_primitives::utils::{format_ether as format_ether_fixed, parse_ether as parse_ether_units};

use crate::error::{Error, Result};

/// Fractional digits of one ether.
const ETHER_DECIMALS: usize = 18;

/// Parses a decimal ether amount such as `0.00001` into wei.
///
/// # Errors
///
/// Returns [`Error::InvalidAmount`] if the string is not a non-negative
/// decimal number with at most 18 fractional digits.
pub fn parse_ether(amount: &str) -> Result<U256> {
    let amount = amount.trim();
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    if amount
        .split_once('.')
        .is_some_and(|(_, fraction)| fraction.len() > ETHER_DECIMALS)
    {
        return Err(Error::InvalidAmount(format!(
            "{amount}: more than {ETHER_DECIMALS} decimals"
        )));
    }
    parse_ether_units(amount).map_err(|e| Error::InvalidAmount(format!("{amount}: {e}")))
}

/// Formats a wei amount as ether without trailing zeros, e.g. `0.00001`.
#[must_use]
pub fn format_ether(wei: U256) -> String {
    let fixed = format_ether_fixed(wei);
    match fixed.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => fixed,
    }
}
