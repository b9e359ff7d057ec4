//! Ethereum addresses typed in by the user.
//!
//! Recipient addresses arrive as command arguments and go straight into the
//! transaction payload, so they are parsed and length-checked here. Addresses
//! reported by the device are kept as the device printed them (see
//! [`crate::wallet::AddressResult`]).
//!
//! # Example
//!
//! ```
//! use wst_core::Address;
//!
//! let addr: Address = "0x7F825230F5F2A26523999c98e0E3f7E2697085A9".parse().unwrap();
//! assert_eq!(addr.to_hex(), "0x7f825230f5f2a26523999c98e0e3f7e2697085a9");
//! ```

use core::fmt;
use core::str::FromStr;

use alloy_primitives::Address as AlloyAddress;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An Ethereum address (20 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(AlloyAddress);

impl Address {
    /// The length of an Ethereum address in bytes.
    pub const BYTE_LEN: usize = 20;

    /// Creates a new address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; Self::BYTE_LEN]) -> Self {
        Self(AlloyAddress::new(bytes))
    }

    /// Returns the zero address (`0x0000...0000`).
    #[must_use]
    pub const fn zero() -> Self {
        Self(AlloyAddress::ZERO)
    }

    /// Checks if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the [`Address`] as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; Self::BYTE_LEN] {
        &self.0.0.0
    }

    /// Returns the [`Address`] as an EIP-55 checksummed hex string.
    #[must_use]
    pub fn to_checksum_hex(&self) -> String {
        self.0.to_checksum(None)
    }

    /// Returns the [`Address`] as a lowercase hex string with `0x` prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.as_bytes()))
    }

    /// Parses an [`Address`] from a hex string, optionally prefixed with `0x`.
    ///
    /// Mixed-case input is accepted without checksum validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the string is not hex or does not
    /// decode to exactly 20 bytes.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes =
            hex::decode(digits).map_err(|e| Error::InvalidAddress(format!("{hex_str}: {e}")))?;

        let bytes: [u8; Self::BYTE_LEN] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            Error::InvalidAddress(format!(
                "{hex_str}: expected {} bytes, got {}",
                Self::BYTE_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self::new(bytes))
    }

    /// Returns the inner [`alloy_primitives::Address`].
    #[must_use]
    pub const fn inner(&self) -> AlloyAddress {
        self.0
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum_hex())
    }
}

impl From<AlloyAddress> for Address {
    fn from(addr: AlloyAddress) -> Self {
        Self(addr)
    }
}

impl From<Address> for AlloyAddress {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPIENT: &str = "0x7F825230F5F2A26523999c98e0E3f7E2697085A9";

    #[test]
    fn address_zero() {
        assert!(Address::zero().is_zero());
        assert!(!Address::new([1u8; 20]).is_zero());
    }

    #[test]
    fn parse_recipient() {
        let addr: Address = RECIPIENT.parse().unwrap();
        assert_eq!(addr.as_bytes()[0], 0x7f);
        assert_eq!(addr.to_hex(), RECIPIENT.to_lowercase());
    }

    #[test]
    fn parse_without_prefix() {
        let with = Address::from_hex(RECIPIENT).unwrap();
        let without = Address::from_hex(&RECIPIENT[2..]).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = Address::from_hex("0x7F825230").unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
    }

    #[test]
    fn rejects_non_hex() {
        let err = Address::from_hex("0xZZ825230F5F2A26523999c98e0E3f7E2697085A9").unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
    }

    #[test]
    fn display_is_checksummed() {
        let addr = Address::from_hex(&RECIPIENT.to_lowercase()).unwrap();
        assert_eq!(addr.to_string(), addr.to_checksum_hex());
        assert!(addr.to_string().starts_with("0x"));
    }

    #[test]
    fn alloy_conversion() {
        let addr = Address::new([7u8; 20]);
        let alloy: AlloyAddress = addr.into();
        assert_eq!(Address::from(alloy), addr);
    }
}
