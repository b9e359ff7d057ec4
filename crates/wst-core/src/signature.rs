//! Signatures returned by the device.
//!
//! The device signs an Ethereum transaction payload and answers with the
//! three ECDSA components:
//!
//! - `r`: 32-byte scalar
//! - `s`: 32-byte scalar
//! - `v`: the recovery id, `0` or `1`
//!
//! Before the signature goes into a legacy transaction, `v` must be remapped
//! to its [EIP-155] form, which folds the chain id in: `35 + 2 * chain_id +
//! recovery_id`.
//!
//! # Example
//!
//! ```
//! use wst_core::Signature;
//!
//! let sig = Signature::new([1u8; 32], [2u8; 32], 0);
//! assert_eq!(sig.eip155_v(1).unwrap(), 37);
//! ```
//!
//! [EIP-155]: https://eips.ethereum.org/EIPS/eip-155

use core::fmt;

use alloy_primitives::U256;

use crate::error::{Error, Result};

/// An ECDSA signature over a transaction payload, as returned by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// The R component of the signature (32 bytes).
    r: [u8; 32],

    /// The S component of the signature (32 bytes).
    s: [u8; 32],

    /// The recovery id (`0` or `1`).
    v: u8,
}

impl Signature {
    /// The length of a serialized signature in bytes.
    pub const BYTE_LEN: usize = 65;

    /// Creates a new signature from raw components.
    ///
    /// The recovery id is not checked here; [`Self::eip155_v`] rejects values
    /// other than `0` and `1`.
    #[must_use]
    pub const fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }

    /// Creates a signature from a 65-byte slice laid out as `r || s || v`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignature`] if the slice is not exactly 65 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::BYTE_LEN {
            return Err(Error::InvalidSignature(format!(
                "expected {} bytes, got {}",
                Self::BYTE_LEN,
                bytes.len()
            )));
        }

        let r: [u8; 32] = bytes[0..32]
            .try_into()
            .map_err(|_| Error::InvalidSignature("invalid r component".to_string()))?;
        let s: [u8; 32] = bytes[32..64]
            .try_into()
            .map_err(|_| Error::InvalidSignature("invalid s component".to_string()))?;

        Ok(Self::new(r, s, bytes[64]))
    }

    /// Serializes the signature to a 65-byte array `r || s || v`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::BYTE_LEN] {
        let mut bytes = [0u8; Self::BYTE_LEN];
        bytes[0..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    /// Returns the R component of the signature.
    #[must_use]
    pub const fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// Returns the S component of the signature.
    #[must_use]
    pub const fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Returns the recovery id as reported by the device.
    #[must_use]
    pub const fn recovery_id(&self) -> u8 {
        self.v
    }

    /// Returns the R component as a [`U256`].
    #[must_use]
    pub const fn r_u256(&self) -> U256 {
        U256::from_be_bytes(self.r)
    }

    /// Returns the S component as a [`U256`].
    #[must_use]
    pub const fn s_u256(&self) -> U256 {
        U256::from_be_bytes(self.s)
    }

    /// Returns the [EIP-155] `v` value for `chain_id`.
    ///
    /// For chain id 1 this is `0x25` (37) for recovery id 0 and `0x26` (38)
    /// for recovery id 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecoveryId`] if the recovery id is not `0` or `1`,
    /// and [`Error::ChainIdOutOfRange`] if `v` does not fit in a `u64`.
    ///
    /// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
    pub fn eip155_v(&self, chain_id: u64) -> Result<u64> {
        match self.v {
            0 | 1 => chain_id
                .checked_mul(2)
                .and_then(|doubled| doubled.checked_add(35 + u64::from(self.v)))
                .ok_or(Error::ChainIdOutOfRange(chain_id)),
            other => Err(Error::InvalidRecoveryId(other)),
        }
    }

    /// Encodes the signature as a hex string with `0x` prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_from_bytes() {
        let mut bytes = [0u8; 65];
        bytes[0..32].copy_from_slice(&[1u8; 32]);
        bytes[32..64].copy_from_slice(&[2u8; 32]);
        bytes[64] = 1;

        let sig = Signature::from_bytes(&bytes).unwrap();

        assert_eq!(sig.r(), &[1u8; 32]);
        assert_eq!(sig.s(), &[2u8; 32]);
        assert_eq!(sig.recovery_id(), 1);
        assert_eq!(sig.to_bytes(), bytes);
    }

    #[test]
    fn signature_from_bytes_invalid_length() {
        let result = Signature::from_bytes(&[0u8; 64]);
        assert!(matches!(result, Err(Error::InvalidSignature(_))));
    }

    #[test]
    fn eip155_v_mainnet() {
        let sig = Signature::new([1u8; 32], [2u8; 32], 0);
        assert_eq!(sig.eip155_v(1).unwrap(), 0x25);

        let sig = Signature::new([1u8; 32], [2u8; 32], 1);
        assert_eq!(sig.eip155_v(1).unwrap(), 0x26);
    }

    #[test]
    fn eip155_v_other_chains() {
        let sig = Signature::new([0u8; 32], [0u8; 32], 1);
        assert_eq!(sig.eip155_v(137).unwrap(), 35 + 274 + 1);
        assert_eq!(sig.eip155_v(11_155_111).unwrap(), 22_310_258);
    }

    #[test]
    fn eip155_v_rejects_bad_recovery_id() {
        for v in [2u8, 27, 28, 0xff] {
            let sig = Signature::new([0u8; 32], [0u8; 32], v);
            assert!(matches!(sig.eip155_v(1), Err(Error::InvalidRecoveryId(id)) if id == v));
        }
    }

    #[test]
    fn eip155_v_rejects_oversized_chain_id() {
        let sig = Signature::new([0u8; 32], [0u8; 32], 1);
        let largest = (u64::MAX - 36) / 2;
        assert_eq!(sig.eip155_v(largest).unwrap(), u64::MAX - 1);

        for chain_id in [largest + 1, u64::MAX / 2, u64::MAX] {
            assert!(matches!(
                sig.eip155_v(chain_id),
                Err(Error::ChainIdOutOfRange(id)) if id == chain_id
            ));
        }
    }

    #[test]
    fn signature_display() {
        let sig = Signature::new([0u8; 32], [0u8; 32], 0);
        let display = format!("{sig}");
        assert!(display.starts_with("0x"));
        assert_eq!(display.len(), 132);
    }
}
