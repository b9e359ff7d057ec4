//! Deterministic collaborators for tests.
//!
//! [`MockDevice`] and [`MockRpc`] answer every call from configured values and
//! record what they were asked, so tests can inspect the exact payload sent
//! for signing and the exact raw transaction broadcast.
//!
//! Available under `cfg(test)` and with the `test-utils` feature.

use std::cell::RefCell;

use alloy_primitives::U256;

use crate::device::{
    ChainType, CoinType, DerivationPath, Device, DeviceInfo, DisplayState, Lifecycle, PinState,
};
use crate::error::{Error, Operation, Result};
use crate::rpc::ChainRpc;
use crate::signature::Signature;

/// Address reported by a default [`MockDevice`].
pub const MOCK_ADDRESS: &str = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";

/// Transaction hash returned by a default [`MockRpc`].
pub const MOCK_TX_HASH: &str =
    "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

/// A call received by a [`MockDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    /// `device_info`.
    DeviceInfo,
    /// `generate_seed` with its length.
    GenerateSeed(u8),
    /// `import_seed`.
    ImportSeed,
    /// `format`.
    Format,
    /// `get_address`.
    GetAddress {
        /// Requested coin.
        coin: CoinType,
        /// Requested path.
        path: DerivationPath,
        /// Whether the address was to be shown on the device.
        display: bool,
    },
    /// `sign_transaction`.
    SignTransaction {
        /// Signing key path.
        path: DerivationPath,
        /// Whether the device was asked for confirmation.
        display: bool,
    },
}

/// A device double, ready (PIN entered, logo shown) by default.
#[derive(Debug, Clone)]
pub struct MockDevice {
    info: DeviceInfo,
    address: String,
    signature: Signature,
    failures: Vec<(Operation, u32)>,
    calls: Vec<DeviceCall>,
    signed_payloads: Vec<Vec<u8>>,
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDevice {
    /// Creates a ready device with a seed, [`MOCK_ADDRESS`] and a recovery
    /// id 0 signature.
    #[must_use]
    pub fn new() -> Self {
        Self {
            info: DeviceInfo {
                pin_state: PinState::LoggedIn,
                chain_type: ChainType::Formal,
                lifecycle: Lifecycle::User,
                serial_number: "WOOKONG-0001".to_string(),
                firmware_version: "1.0.4".to_string(),
                display_state: DisplayState::Logo,
            },
            address: MOCK_ADDRESS.to_string(),
            signature: Signature::new([1u8; 32], [2u8; 32], 0),
            failures: Vec::new(),
            calls: Vec::new(),
            signed_payloads: Vec::new(),
        }
    }

    /// Replaces the whole status snapshot.
    #[must_use]
    pub fn with_info(mut self, info: DeviceInfo) -> Self {
        self.info = info;
        self
    }

    /// Sets the reported PIN state.
    #[must_use]
    pub fn with_pin_state(mut self, pin_state: PinState) -> Self {
        self.info.pin_state = pin_state;
        self
    }

    /// Sets the reported display state.
    #[must_use]
    pub fn with_display_state(mut self, display_state: DisplayState) -> Self {
        self.info.display_state = display_state;
        self
    }

    /// Sets the reported lifecycle.
    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.info.lifecycle = lifecycle;
        self
    }

    /// Sets the address returned for every path.
    #[must_use]
    pub fn with_address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    /// Sets the signature returned for every payload.
    #[must_use]
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Makes every call of `operation` fail with `code`.
    #[must_use]
    pub fn fail(mut self, operation: Operation, code: u32) -> Self {
        self.failures.push((operation, code));
        self
    }

    /// Makes the status query fail with `code`.
    #[must_use]
    pub fn fail_device_info(self, code: u32) -> Self {
        self.fail(Operation::GetDeviceInfo, code)
    }

    /// Returns every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Returns every payload passed to `sign_transaction`, in order.
    #[must_use]
    pub fn signed_payloads(&self) -> &[Vec<u8>] {
        &self.signed_payloads
    }

    fn outcome(&self, operation: Operation) -> Result<()> {
        match self.failures.iter().find(|(op, _)| *op == operation) {
            Some(&(op, code)) => Err(Error::device(op, code)),
            None => Ok(()),
        }
    }
}

impl Device for MockDevice {
    fn device_info(&mut self) -> Result<DeviceInfo> {
        self.calls.push(DeviceCall::DeviceInfo);
        self.outcome(Operation::GetDeviceInfo)?;
        Ok(self.info.clone())
    }

    fn generate_seed(&mut self, seed_len: u8) -> Result<()> {
        self.calls.push(DeviceCall::GenerateSeed(seed_len));
        self.outcome(Operation::GenerateSeed)?;
        self.info.lifecycle = Lifecycle::User;
        Ok(())
    }

    fn import_seed(&mut self) -> Result<()> {
        self.calls.push(DeviceCall::ImportSeed);
        self.outcome(Operation::ImportSeed)?;
        self.info.lifecycle = Lifecycle::User;
        Ok(())
    }

    fn format(&mut self) -> Result<()> {
        self.calls.push(DeviceCall::Format);
        self.outcome(Operation::Format)?;
        self.info.lifecycle = Lifecycle::AwaitingSeed;
        Ok(())
    }

    fn get_address(
        &mut self,
        coin: CoinType,
        path: &DerivationPath,
        display: bool,
    ) -> Result<String> {
        self.calls.push(DeviceCall::GetAddress {
            coin,
            path: path.clone(),
            display,
        });
        self.outcome(Operation::GetAddress)?;
        Ok(self.address.clone())
    }

    fn sign_transaction(
        &mut self,
        path: &DerivationPath,
        payload: &[u8],
        display: bool,
    ) -> Result<Signature> {
        self.calls.push(DeviceCall::SignTransaction {
            path: path.clone(),
            display,
        });
        self.outcome(Operation::SignEthereum)?;
        self.signed_payloads.push(payload.to_vec());
        Ok(self.signature)
    }
}

/// A chain RPC double.
///
/// Defaults: nonce 5, gas price 20 gwei, balance 1 ether, and
/// [`MOCK_TX_HASH`] for every broadcast.
#[derive(Debug, Clone)]
pub struct MockRpc {
    nonce: u64,
    gas_price: U256,
    balance: U256,
    tx_hash: String,
    failure: Option<String>,
    queried: RefCell<Vec<String>>,
    broadcast: RefCell<Vec<String>>,
}

impl Default for MockRpc {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRpc {
    /// Creates a double with the default answers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nonce: 5,
            gas_price: U256::from(20_000_000_000u64),
            balance: U256::from(1_000_000_000_000_000_000u64),
            tx_hash: MOCK_TX_HASH.to_string(),
            failure: None,
            queried: RefCell::new(Vec::new()),
            broadcast: RefCell::new(Vec::new()),
        }
    }

    /// Sets the transaction count.
    #[must_use]
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the gas price in wei.
    #[must_use]
    pub fn with_gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = gas_price;
        self
    }

    /// Sets the balance in wei.
    #[must_use]
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    /// Makes every call fail with [`Error::Rpc`] carrying `message`.
    #[must_use]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Returns every address queried for nonce or balance, in order.
    #[must_use]
    pub fn queried_addresses(&self) -> Vec<String> {
        self.queried.borrow().clone()
    }

    /// Returns every raw transaction broadcast, in order.
    #[must_use]
    pub fn broadcast_transactions(&self) -> Vec<String> {
        self.broadcast.borrow().clone()
    }

    fn outcome(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(Error::Rpc(message.clone())),
            None => Ok(()),
        }
    }
}

impl ChainRpc for MockRpc {
    fn transaction_count(&self, address: &str) -> Result<u64> {
        self.outcome()?;
        self.queried.borrow_mut().push(address.to_string());
        Ok(self.nonce)
    }

    fn gas_price(&self) -> Result<U256> {
        self.outcome()?;
        Ok(self.gas_price)
    }

    fn balance(&self, address: &str) -> Result<U256> {
        self.outcome()?;
        self.queried.borrow_mut().push(address.to_string());
        Ok(self.balance)
    }

    fn send_raw_transaction(&self, raw: &str) -> Result<String> {
        self.outcome()?;
        self.broadcast.borrow_mut().push(raw.to_string());
        Ok(self.tx_hash.clone())
    }
}
