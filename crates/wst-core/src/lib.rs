//! WOOKONG Solo Tutorial Wallet Core Library
//!
//! This crate drives a WOOKONG Solo hardware wallet and an Ethereum JSON-RPC
//! node to show device status, derive addresses, look up balances, and build,
//! sign and broadcast Ether transfers.
//!
//! # Overview
//!
//! Keys never leave the device. The wallet only asks it for a status snapshot,
//! for the address at a derivation path, and for a signature over an RLP
//! payload it assembles from node-provided values.
//!
//! This library provides:
//!
//! - **Return Codes**: readable descriptions of every vendor library status
//! - **Device Port**: the [`device::Device`] trait, the status model and
//!   derivation paths
//! - **Readiness Gate**: PIN and screen checks run before any key operation
//! - **Transactions**: EIP-155 legacy transfers and their signing payload
//! - **Chain RPC**: the [`rpc::ChainRpc`] trait and a blocking HTTP client
//! - **Workflows**: [`Wallet`], one method per user command
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Command Dispatcher (wst-cli)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       Wallet workflows                      │
//! │   info / init / format  │  addr / balance  │      send      │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Readiness │ Transaction │  Signature  │ Units │ Return Code │
//! │   Gate    │  Assembly   │  (EIP-155)  │       │ Translator  │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │         Device port          │        Chain RPC port        │
//! │  EWallet FFI │ MockDevice    │     HttpRpc │ MockRpc        │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Building a Signing Payload
//!
//! ```rust
//! use wst_core::{Address, LegacyTransaction, U256};
//!
//! let tx = LegacyTransaction {
//!     chain_id: 1,
//!     nonce: 0,
//!     gas_price: U256::from(1_000_000_000u64),
//!     gas_limit: wst_core::TRANSFER_GAS_LIMIT,
//!     to: "0x7F825230F5F2A26523999c98e0E3f7E2697085A9".parse().unwrap(),
//!     value: U256::from(10_000_000_000_000_000u64),
//!     data: vec![],
//! };
//!
//! // The device hashes and signs this pre-image itself
//! let payload = tx.signing_payload();
//! assert_eq!(payload[0], 0xea);
//! ```
//!
//! ## Translating Return Codes
//!
//! ```rust
//! use wst_core::code::{ReturnCode, describe};
//!
//! assert_eq!(describe(ReturnCode::DevOpCancel.raw()), "operation canceled");
//! assert_eq!(describe(0x1234), "unknown return code: 0x1234");
//! ```
//!
//! ## Running a Workflow
//!
//! ```ignore
//! use wst_core::device::EWalletDevice;
//! use wst_core::rpc::{HttpRpc, HttpRpcConfig};
//! use wst_core::{Wallet, WalletConfig};
//!
//! let device = EWalletDevice::open()?;
//! let rpc = HttpRpc::new(&HttpRpcConfig::default())?;
//! let mut wallet = Wallet::new(device, rpc, WalletConfig::default());
//!
//! let path = "[0,2147483692,2147483708,2147483648,0,0]".parse()?;
//! let balance = wallet.balance(&path)?;
//! println!("{} holds {} Ether", balance.address, balance.ether());
//! ```
//!
//! # Feature Flags
//!
//! - `vendor-sdk`: builds [`device::EWalletDevice`], linking `libEWallet`
//! - `test-utils`: exposes the `testing` module with device and RPC doubles
//!
//! # Security Considerations
//!
//! - Private keys never leave the device
//! - Every key operation re-checks that the PIN is entered
//! - Signing always requires confirmation on the device screen

// Modules
pub mod address;
pub mod code;
pub mod device;
pub mod error;
pub mod readiness;
pub mod rpc;
pub mod signature;
pub mod transaction;
pub mod units;
pub mod wallet;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports for convenience
pub use address::Address;
pub use device::{CoinType, DerivationPath, Device, DeviceInfo};
pub use error::{Error, Operation, Result};
pub use rpc::ChainRpc;
pub use signature::Signature;
pub use transaction::{LegacyTransaction, TRANSFER_GAS_LIMIT};
pub use wallet::{AddressResult, Balance, InitMode, SendReceipt, Wallet, WalletConfig};

// Re-export commonly used alloy types
pub use alloy_primitives::{B256, U256};
