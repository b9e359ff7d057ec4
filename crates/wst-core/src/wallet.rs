//! Wallet workflows over a [`Device`] and a [`ChainRpc`].
//!
//! Each public method of [`Wallet`] is one user command. Device state is never
//! cached: every workflow that touches keys starts with a fresh readiness
//! check, and every address is derived again from its path.
//!
//! # Example
//!
//! ```ignore
//! use wst_core::testing::{MockDevice, MockRpc};
//! use wst_core::{DerivationPath, Wallet, WalletConfig};
//!
//! let mut wallet = Wallet::new(MockDevice::new(), MockRpc::new(), WalletConfig::default());
//! let path: DerivationPath = "[0,2147483692,2147483708,2147483648,0,0]".parse().unwrap();
//!
//! let resolved = wallet.address(&path, true).unwrap();
//! assert!(resolved.address.starts_with("0x"));
//! ```

use alloy_primitives::U256;
use tracing::{debug, info};

use crate::address::Address;
use crate::device::{CoinType, DerivationPath, Device, DeviceInfo, Lifecycle};
use crate::error::{Error, Result};
use crate::readiness;
use crate::rpc::ChainRpc;
use crate::transaction::{LegacyTransaction, TRANSFER_GAS_LIMIT};
use crate::units::format_ether;

/// Settings shared by all workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// EIP-155 chain id folded into signatures.
    pub chain_id: u64,
    /// Coin whose addresses are derived.
    pub coin_type: CoinType,
    /// Prefix of the block explorer link printed after a broadcast.
    pub explorer_tx_url: String,
}

impl WalletConfig {
    /// The explorer used when none is configured.
    pub const DEFAULT_EXPLORER_TX_URL: &'static str = "https://etherscan.io/tx/";
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            coin_type: CoinType::Ethereum,
            explorer_tx_url: Self::DEFAULT_EXPLORER_TX_URL.to_string(),
        }
    }
}

/// How a fresh device receives its seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    /// The device generates a seed of the given length.
    Generate {
        /// Seed length in bytes.
        seed_len: u8,
    },
    /// The user enters an existing mnemonic on the device.
    Import,
}

impl InitMode {
    /// Returns the mode name as typed on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::Import => "import",
        }
    }
}

/// An address the device derived for a path.
///
/// Only valid for the command that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressResult {
    /// The path the address was derived from.
    pub path: DerivationPath,
    /// The address exactly as the device reported it.
    pub address: String,
}

/// The balance of a derived address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    /// The queried address.
    pub address: String,
    /// The balance in wei.
    pub wei: U256,
}

impl Balance {
    /// Returns the balance in ether, e.g. `0.5`.
    #[must_use]
    pub fn ether(&self) -> String {
        format_ether(self.wei)
    }
}

/// The outcome of a successful `send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Sender address as reported by the device.
    pub from: String,
    /// The transaction that was signed and broadcast.
    pub transaction: LegacyTransaction,
    /// The broadcast `0x`-prefixed raw transaction.
    pub raw_transaction: String,
    /// Transaction hash returned by the node.
    pub tx_hash: String,
    /// Block explorer link for [`Self::tx_hash`].
    pub explorer_url: String,
}

impl SendReceipt {
    /// Returns the transferred value in ether.
    #[must_use]
    pub fn value_ether(&self) -> String {
        format_ether(self.transaction.value)
    }
}

/// A hardware wallet session: one device and one chain endpoint.
#[derive(Debug)]
pub struct Wallet<D, R> {
    device: D,
    rpc: R,
    config: WalletConfig,
}

impl<D: Device, R: ChainRpc> Wallet<D, R> {
    /// Creates a session over `device` and `rpc`.
    pub fn new(device: D, rpc: R, config: WalletConfig) -> Self {
        Self {
            device,
            rpc,
            config,
        }
    }

    /// Returns the session settings.
    pub const fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Returns the device.
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Returns the chain endpoint.
    pub const fn rpc(&self) -> &R {
        &self.rpc
    }

    /// Reads the device status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the query fails.
    pub fn device_info(&mut self) -> Result<DeviceInfo> {
        self.device.device_info().map_err(readiness::unavailable)
    }

    /// Gives a fresh device its seed.
    ///
    /// # Errors
    ///
    /// - [`Error::DeviceUnavailable`] if the status query fails
    /// - [`Error::LifecycleMismatch`] if the device already holds a seed or
    ///   is otherwise not awaiting one
    /// - [`Error::Device`] if the device refuses the operation
    pub fn init(&mut self, mode: InitMode) -> Result<()> {
        let info = self.device_info()?;
        if info.lifecycle != Lifecycle::AwaitingSeed {
            return Err(Error::LifecycleMismatch(info.lifecycle));
        }

        debug!(mode = mode.name(), "initializing device");
        match mode {
            InitMode::Generate { seed_len } => self.device.generate_seed(seed_len),
            InitMode::Import => self.device.import_seed(),
        }
    }

    /// Wipes the device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the status query fails, or
    /// [`Error::Device`] if the device refuses.
    pub fn format(&mut self) -> Result<()> {
        self.device_info()?;
        self.device.format()
    }

    /// Runs the readiness gate against a fresh status snapshot.
    ///
    /// # Errors
    ///
    /// See [`readiness::ensure_ready`].
    pub fn ensure_ready(&mut self) -> Result<DeviceInfo> {
        readiness::ensure_ready(&mut self.device)
    }

    /// Resolves the address at `path`, optionally showing it on the device.
    ///
    /// With `display` set this blocks until the user confirms on the device.
    ///
    /// # Errors
    ///
    /// Fails if the device is not ready or refuses the derivation.
    pub fn address(&mut self, path: &DerivationPath, display: bool) -> Result<AddressResult> {
        self.ensure_ready()?;
        self.resolve(path, display)
    }

    /// Looks up the balance of the address at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the device is not ready, refuses the derivation, or the
    /// balance query fails.
    pub fn balance(&mut self, path: &DerivationPath) -> Result<Balance> {
        self.ensure_ready()?;
        let AddressResult { address, .. } = self.resolve(path, false)?;
        let wei = self.rpc.balance(&address)?;
        Ok(Balance { address, wei })
    }

    /// Transfers `value` wei from the address at `path` to `to`.
    ///
    /// The steps run in order and the first failure aborts the whole send:
    ///
    /// 1. readiness gate
    /// 2. silent sender address derivation
    /// 3. nonce and gas price from the node
    /// 4. signing of the EIP-155 payload, confirmed on the device
    /// 5. broadcast of the signed raw transaction
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step.
    pub fn send(
        &mut self,
        path: &DerivationPath,
        to: Address,
        value: U256,
    ) -> Result<SendReceipt> {
        self.ensure_ready()?;
        let AddressResult { address: from, .. } = self.resolve(path, false)?;

        let nonce = self.rpc.transaction_count(&from)?;
        let gas_price = self.rpc.gas_price()?;

        let transaction = LegacyTransaction {
            chain_id: self.config.chain_id,
            nonce,
            gas_price,
            gas_limit: TRANSFER_GAS_LIMIT,
            to,
            value,
            data: Vec::new(),
        };

        let payload = transaction.signing_payload();
        debug!(
            nonce,
            %gas_price,
            hash = %transaction.signing_hash(),
            "requesting signature"
        );
        let signature = self.device.sign_transaction(path, &payload, true)?;
        let raw_transaction = transaction.raw_transaction(&signature)?;

        let tx_hash = self.rpc.send_raw_transaction(&raw_transaction)?;
        info!(%tx_hash, %from, "transaction broadcast");

        Ok(SendReceipt {
            explorer_url: format!("{}{tx_hash}", self.config.explorer_tx_url),
            from,
            transaction,
            raw_transaction,
            tx_hash,
        })
    }

    fn resolve(&mut self, path: &DerivationPath, display: bool) -> Result<AddressResult> {
        let address = self
            .device
            .get_address(self.config.coin_type, path, display)?;
        debug!(%path, %address, "address resolved");
        Ok(AddressResult {
            path: path.clone(),
            address,
        })
    }
}
