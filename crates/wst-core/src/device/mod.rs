//! Hardware device access.
//!
//! All key material lives on the device; the wallet only asks it for status,
//! addresses and signatures through the [`Device`] trait. The trait keeps the
//! workflows independent of how the device is reached:
//!
//! - the vendor's native library (`ewallet`, behind the `vendor-sdk` feature)
//! - test doubles (see `crate::testing`)
//!
//! # Example
//!
//! ```ignore
//! use wst_core::device::{CoinType, DerivationPath, Device};
//!
//! let mut device = open_device()?;
//! let info = device.device_info()?;
//! println!("{info}");
//!
//! let path: DerivationPath = "[0,2147483692,2147483708,2147483648,0,0]".parse()?;
//! let address = device.get_address(CoinType::Ethereum, &path, true)?;
//! ```

mod info;
mod path;

#[cfg(feature = "vendor-sdk")]
pub mod ewallet;

pub use info::{ChainType, DeviceInfo, DisplayState, Lifecycle, PinState};
pub use path::DerivationPath;

#[cfg(feature = "vendor-sdk")]
pub use ewallet::EWalletDevice;

use crate::error::Result;
use crate::signature::Signature;

/// Coins the device knows how to derive addresses for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CoinType {
    /// Bitcoin.
    Bitcoin = 0x00,
    /// Ethereum.
    Ethereum = 0x01,
    /// Cybex.
    Cybex = 0x02,
    /// EOS.
    Eos = 0x03,
}

impl CoinType {
    /// Returns the coin identifier passed to the device.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns the ticker shown to the user.
    #[must_use]
    pub const fn ticker(self) -> &'static str {
        match self {
            Self::Bitcoin => "BTC",
            Self::Ethereum => "ETH",
            Self::Cybex => "CYB",
            Self::Eos => "EOS",
        }
    }
}

/// The capabilities the wallet needs from a signing device.
///
/// Every call may block: address display and signing wait until the user
/// confirms on the device screen. A failed call reports the device return
/// code as [`crate::Error::Device`].
pub trait Device {
    /// Reads a fresh status snapshot.
    fn device_info(&mut self) -> Result<DeviceInfo>;

    /// Generates a new seed of `seed_len` bytes on the device.
    fn generate_seed(&mut self, seed_len: u8) -> Result<()>;

    /// Imports a seed entered on the device.
    fn import_seed(&mut self) -> Result<()>;

    /// Wipes the device.
    fn format(&mut self) -> Result<()>;

    /// Derives the address of `coin` at `path`.
    ///
    /// With `display` set the device shows the address and waits for the
    /// user to confirm it.
    fn get_address(
        &mut self,
        coin: CoinType,
        path: &DerivationPath,
        display: bool,
    ) -> Result<String>;

    /// Signs an Ethereum transaction pre-image with the key at `path`.
    ///
    /// `payload` is the RLP encoding to be hashed and signed by the device.
    fn sign_transaction(
        &mut self,
        path: &DerivationPath,
        payload: &[u8],
        display: bool,
    ) -> Result<Signature>;
}
