//! Error types for the tutorial wallet core.
//!
//! This module provides the error type [`enum@Error`] that covers every failure
//! a wallet command can run into, from a refused device call to a malformed
//! command argument.
//!
//! # Error Categories
//!
//! - **Device errors**: non-success return codes from the vendor library
//! - **Readiness errors**: PIN or screen state that forbids the operation
//! - **Chain RPC errors**: transport failures and JSON-RPC error objects
//! - **Parse errors**: malformed derivation paths, addresses, amounts, signatures
//!
//! # Example
//!
//! ```
//! use wst_core::Error;
//!
//! fn example() -> Result<(), Error> {
//!     let err = Error::PinNotUnlocked;
//!     assert!(matches!(err, Error::PinNotUnlocked));
//!     Ok(())
//! }
//! ```

use core::fmt;
use core::result::Result as CoreResult;

use thiserror::Error;

use crate::device::{DisplayState, Lifecycle};

/// A device call, used to label the failure reported for its return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Reading the device status snapshot.
    GetDeviceInfo,
    /// Generating a fresh seed on the device.
    GenerateSeed,
    /// Importing a seed through the device screen.
    ImportSeed,
    /// Wiping the device.
    Format,
    /// Deriving an address for a derivation path.
    GetAddress,
    /// Signing an Ethereum transaction.
    SignEthereum,
}

impl Operation {
    /// Returns the label printed in front of a failure.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GetDeviceInfo => "get device info",
            Self::GenerateSeed => "generate",
            Self::ImportSeed => "import",
            Self::Format => "format",
            Self::GetAddress => "get address",
            Self::SignEthereum => "ETH sign",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The main error type for the tutorial wallet.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Device Errors
    // =========================================================================
    /// The vendor library returned a non-success code.
    #[error("{operation} failed: {}", crate::code::describe(*.code))]
    Device {
        /// The call that failed.
        operation: Operation,
        /// The raw return code.
        code: u32,
    },

    /// The device status could not be read at all.
    #[error("get device info failed: {}", crate::code::describe(*.0))]
    DeviceUnavailable(u32),

    // =========================================================================
    // Readiness Errors
    // =========================================================================
    /// The PIN has not been entered on the device.
    #[error("invalid PIN state, please unlock PIN first")]
    PinNotUnlocked,

    /// The device screen is in the middle of another operation.
    #[error("invalid display state ({0}), please ensure the device is showing its logo first")]
    DisplayBusy(DisplayState),

    /// The device lifecycle does not allow the requested operation.
    #[error("init failed: device lifecycle is {0}")]
    LifecycleMismatch(Lifecycle),

    // =========================================================================
    // Chain RPC Errors
    // =========================================================================
    /// The RPC endpoint could not be reached or answered with a bad status.
    #[error("RPC request failed: {0}")]
    Rpc(String),

    /// The RPC endpoint answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    RpcResponse {
        /// The JSON-RPC error code.
        code: i64,
        /// The message attached by the node.
        message: String,
    },

    /// The RPC result could not be interpreted.
    #[error("malformed RPC result: {0}")]
    MalformedRpcResult(String),

    // =========================================================================
    // Parse Errors
    // =========================================================================
    /// The derivation path argument is invalid.
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    /// The address argument is invalid.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The ether amount argument is invalid.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The signature returned by the device is malformed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The signature recovery id is neither 0 nor 1.
    #[error("invalid signature recovery id: {0:#04x}")]
    InvalidRecoveryId(u8),

    /// The chain id is too large for an EIP-155 `v` value.
    #[error("chain id {0} is out of range for EIP-155")]
    ChainIdOutOfRange(u64),
}

impl Error {
    /// Builds the error for a non-success return code of `operation`.
    #[must_use]
    pub const fn device(operation: Operation, code: u32) -> Self {
        Self::Device { operation, code }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Rpc(err.to_string())
    }
}

/// A specialized [`Result`] type for wallet operations.
pub type Result<T> = CoreResult<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::ReturnCode;

    #[test]
    fn device_error_display() {
        let err = Error::device(Operation::GetAddress, ReturnCode::DevOpCancel.raw());
        assert_eq!(err.to_string(), "get address failed: operation canceled");

        let err = Error::DeviceUnavailable(ReturnCode::DevOpenFail.raw());
        assert_eq!(err.to_string(), "get device info failed: open device failed");
    }

    #[test]
    fn unknown_code_is_embedded() {
        let err = Error::device(Operation::SignEthereum, 0x1234);
        assert_eq!(err.to_string(), "ETH sign failed: unknown return code: 0x1234");
    }

    #[test]
    fn readiness_error_display() {
        assert_eq!(
            Error::PinNotUnlocked.to_string(),
            "invalid PIN state, please unlock PIN first"
        );
        assert_eq!(
            Error::LifecycleMismatch(Lifecycle::User).to_string(),
            "init failed: device lifecycle is normal state, seed generated"
        );
    }

    #[test]
    fn chain_id_error_display() {
        assert_eq!(
            Error::ChainIdOutOfRange(u64::MAX).to_string(),
            "chain id 18446744073709551615 is out of range for EIP-155"
        );
    }
}
