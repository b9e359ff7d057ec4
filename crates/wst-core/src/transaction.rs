//! Legacy Ethereum value transfers and their signing payload.
//!
//! The device hashes and signs the RLP payload itself, so unlike a software
//! signer the wallet hands over the encoded pre-image rather than its hash.
//!
//! # Signing Flow
//!
//! 1. Build a [`LegacyTransaction`] from the RPC-provided nonce and gas price
//! 2. Send [`LegacyTransaction::signing_payload`] to the device
//! 3. Combine the returned signature with [`LegacyTransaction::raw_transaction`]
//! 4. Broadcast the `0x`-prefixed raw transaction
//!
//! # Example
//!
//! ```
//! use wst_core::{Address, LegacyTransaction, U256};
//!
//! let tx = LegacyTransaction {
//!     chain_id: 1,
//!     nonce: 0,
//!     gas_price: U256::from(1_000_000_000u64),
//!     gas_limit: 21000,
//!     to: Address::zero(),
//!     value: U256::from(10_000_000_000_000_000u64),
//!     data: vec![],
//! };
//!
//! let payload = tx.signing_payload();
//! assert_eq!(payload.len(), 43);
//! ```

use alloy_primitives::{B256, U256, keccak256};
use alloy_rlp::Encodable;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::Result;
use crate::signature::Signature;

/// Gas used by a plain value transfer.
///
/// Only valid for transfers to externally owned accounts without calldata.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// An EIP-155 legacy transaction.
///
/// This is the traditional Ethereum transaction format with chain ID
/// replay protection as specified in [EIP-155].
///
/// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTransaction {
    /// The chain ID for replay protection.
    pub chain_id: u64,

    /// The transaction nonce.
    pub nonce: u64,

    /// The gas price in wei.
    pub gas_price: U256,

    /// The gas limit.
    pub gas_limit: u64,

    /// The recipient address.
    pub to: Address,

    /// The value to transfer in wei.
    pub value: U256,

    /// The transaction input data.
    pub data: Vec<u8>,
}

impl LegacyTransaction {
    /// Returns the RLP pre-image the device signs.
    ///
    /// For EIP-155 transactions this is
    /// `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);

        encode_rlp_list(&mut buf, |buf| {
            self.encode_fields(buf);
            self.chain_id.encode(buf);
            0u8.encode(buf);
            0u8.encode(buf);
        });

        buf
    }

    /// Returns the hash the device computes over [`Self::signing_payload`].
    #[must_use]
    pub fn signing_hash(&self) -> B256 {
        keccak256(self.signing_payload())
    }

    /// Creates the signed transaction by combining this transaction with a
    /// signature over [`Self::signing_payload`].
    ///
    /// Encodes `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`
    /// with `v = 35 + 2 * chain_id + recovery_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidRecoveryId`] if the signature's recovery
    /// id is not `0` or `1`.
    pub fn signed_rlp(&self, signature: &Signature) -> Result<Vec<u8>> {
        let v = signature.eip155_v(self.chain_id)?;
        let mut buf = Vec::with_capacity(128);

        encode_rlp_list(&mut buf, |buf| {
            self.encode_fields(buf);
            v.encode(buf);
            signature.r_u256().encode(buf);
            signature.s_u256().encode(buf);
        });

        Ok(buf)
    }

    /// Returns the signed transaction as `0x`-prefixed hex, ready for
    /// `eth_sendRawTransaction`.
    ///
    /// # Errors
    ///
    /// See [`Self::signed_rlp`].
    pub fn raw_transaction(&self, signature: &Signature) -> Result<String> {
        Ok(format!("0x{}", hex::encode(self.signed_rlp(signature)?)))
    }

    /// Encodes the six fields shared by the payload and the signed form.
    fn encode_fields(&self, out: &mut Vec<u8>) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.inner().encode(out);
        self.value.encode(out);
        self.data.as_slice().encode(out);
    }
}

/// Encodes an RLP list using a closure to write elements.
fn encode_rlp_list<F>(out: &mut Vec<u8>, f: F)
where
    F: FnOnce(&mut Vec<u8>),
{
    let mut content = Vec::new();
    f(&mut content);

    let header = alloy_rlp::Header {
        list: true,
        payload_length: content.len(),
    };
    header.encode(out);
    out.extend_from_slice(&content);
}
