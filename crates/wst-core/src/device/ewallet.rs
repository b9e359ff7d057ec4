//! [`Device`] implementation over the vendor's native `EWallet` library.
//!
//! The library manages USB enumeration, the device protocol and all key
//! operations. This module only marshals arguments across the C boundary and
//! turns return codes into [`Error::Device`].
//!
//! Only the first enumerated device is used, and it is owned exclusively for
//! the lifetime of the [`EWalletDevice`].
//!
//! # Example
//!
//! ```ignore
//! use wst_core::device::{Device, EWalletDevice};
//!
//! let mut device = EWalletDevice::open()?;
//! println!("{}", device.device_info()?);
//! ```

use std::ffi::{c_int, c_void};
use std::fmt;
use std::ptr::{self, NonNull};

use tracing::debug;

use super::{
    ChainType, CoinType, DerivationPath, Device, DeviceInfo, DisplayState, Lifecycle, PinState,
};
use crate::code::ReturnCode;
use crate::error::{Error, Operation, Result};
use crate::signature::Signature;

/// Index of the device used among those enumerated.
const DEV_INDEX: usize = 0;

/// Request every field of the device information block.
const DEV_INFO_ALL: u32 = 0xFFFF_FFFF;

/// Room for the longest address the library returns, terminator included.
const ADDRESS_CAPACITY: usize = 128;

/// Device information block filled by `PAEW_GetDevInfo`.
#[repr(C)]
struct RawDevInfo {
    pin_state: u8,
    #[expect(dead_code, reason = "filled by the library, not reported")]
    cos_type: u8,
    chain_type: u8,
    serial_number: [u8; 32],
    cos_version: [u8; 4],
    life_cycle: u8,
    lcd_state: u32,
}

impl RawDevInfo {
    const fn zeroed() -> Self {
        Self {
            pin_state: 0,
            cos_type: 0,
            chain_type: 0,
            serial_number: [0; 32],
            cos_version: [0; 4],
            life_cycle: 0,
            lcd_state: 0,
        }
    }

    fn to_device_info(&self) -> DeviceInfo {
        let serial_len = self
            .serial_number
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.serial_number.len());
        let firmware_version = self
            .cos_version
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(".");

        DeviceInfo {
            pin_state: PinState::from_raw(self.pin_state),
            chain_type: ChainType::from_raw(self.chain_type),
            lifecycle: Lifecycle::from_raw(self.life_cycle),
            serial_number: String::from_utf8_lossy(&self.serial_number[..serial_len])
                .into_owned(),
            firmware_version,
            display_state: DisplayState::from_raw(self.lcd_state),
        }
    }
}

#[link(name = "EWallet")]
unsafe extern "C" {
    fn PAEW_InitContext(ctx: *mut *mut c_void, dev_count: *mut usize) -> c_int;
    fn PAEW_FreeContext(ctx: *mut c_void) -> c_int;
    fn PAEW_GetDevInfo(
        ctx: *mut c_void,
        dev_index: usize,
        info_types: u32,
        info: *mut RawDevInfo,
    ) -> c_int;
    fn PAEW_GenerateSeed(
        ctx: *mut c_void,
        dev_index: usize,
        seed_len: u8,
        n: u8,
        t: u8,
    ) -> c_int;
    fn PAEW_ImportSeed(ctx: *mut c_void, dev_index: usize) -> c_int;
    fn PAEW_Format(ctx: *mut c_void, dev_index: usize) -> c_int;
    fn PAEW_DeriveTradeAddress(
        ctx: *mut c_void,
        dev_index: usize,
        coin_type: u8,
        path: *const u32,
        path_len: usize,
    ) -> c_int;
    fn PAEW_GetTradeAddress(
        ctx: *mut c_void,
        dev_index: usize,
        coin_type: u8,
        show_on_screen: u8,
        address: *mut u8,
        address_len: *mut usize,
    ) -> c_int;
    fn PAEW_ETH_TXSign(
        ctx: *mut c_void,
        dev_index: usize,
        tx: *const u8,
        tx_len: usize,
        sig: *mut u8,
        sig_len: *mut usize,
    ) -> c_int;
}

#[expect(
    clippy::cast_sign_loss,
    reason = "return codes are 32-bit patterns with the high bit set"
)]
const fn raw_code(code: c_int) -> u32 {
    code as u32
}

fn check(operation: Operation, code: c_int) -> Result<()> {
    let code = raw_code(code);
    if code == ReturnCode::Success.raw() {
        Ok(())
    } else {
        debug!(%operation, code = format_args!("{code:#x}"), "device call failed");
        Err(Error::device(operation, code))
    }
}

/// A device reached through the vendor library.
pub struct EWalletDevice {
    /// The library context owning the USB handles.
    ctx: NonNull<c_void>,
}

impl fmt::Debug for EWalletDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EWalletDevice").finish_non_exhaustive()
    }
}

impl EWalletDevice {
    /// Creates a library context and checks that a device is attached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the context cannot be created
    /// or no device is enumerated.
    pub fn open() -> Result<Self> {
        let mut ctx = ptr::null_mut();
        let mut dev_count = 0usize;

        // SAFETY: both out-pointers reference live locals.
        let code = unsafe { PAEW_InitContext(&raw mut ctx, &raw mut dev_count) };
        let code = raw_code(code);
        if code != ReturnCode::Success.raw() {
            return Err(Error::DeviceUnavailable(code));
        }

        let ctx = NonNull::new(ctx)
            .ok_or(Error::DeviceUnavailable(ReturnCode::InternalError.raw()))?;
        let device = Self { ctx };

        if dev_count == 0 {
            return Err(Error::DeviceUnavailable(ReturnCode::DevEnumFail.raw()));
        }

        debug!(dev_count, "vendor library context created");
        Ok(device)
    }

    fn derive(&mut self, coin: CoinType, path: &DerivationPath) -> Result<()> {
        let indices = path.indices();
        // SAFETY: the context is live and `indices` outlives the call.
        let code = unsafe {
            PAEW_DeriveTradeAddress(
                self.ctx.as_ptr(),
                DEV_INDEX,
                coin.id(),
                indices.as_ptr(),
                indices.len(),
            )
        };
        check(Operation::GetAddress, code)
    }
}

impl Drop for EWalletDevice {
    fn drop(&mut self) {
        // SAFETY: the context was created by `PAEW_InitContext` and is freed once.
        let code = raw_code(unsafe { PAEW_FreeContext(self.ctx.as_ptr()) });
        if code != ReturnCode::Success.raw() {
            debug!(code = format_args!("{code:#x}"), "failed to free vendor library context");
        }
    }
}

impl Device for EWalletDevice {
    fn device_info(&mut self) -> Result<DeviceInfo> {
        let mut raw = RawDevInfo::zeroed();
        // SAFETY: the context is live and `raw` is a properly laid out block.
        let code = unsafe {
            PAEW_GetDevInfo(self.ctx.as_ptr(), DEV_INDEX, DEV_INFO_ALL, &raw mut raw)
        };
        check(Operation::GetDeviceInfo, code)?;
        Ok(raw.to_device_info())
    }

    fn generate_seed(&mut self, seed_len: u8) -> Result<()> {
        // SAFETY: the context is live.
        let code = unsafe { PAEW_GenerateSeed(self.ctx.as_ptr(), DEV_INDEX, seed_len, 0, 0) };
        check(Operation::GenerateSeed, code)
    }

    fn import_seed(&mut self) -> Result<()> {
        // SAFETY: the context is live.
        let code = unsafe { PAEW_ImportSeed(self.ctx.as_ptr(), DEV_INDEX) };
        check(Operation::ImportSeed, code)
    }

    fn format(&mut self) -> Result<()> {
        // SAFETY: the context is live.
        let code = unsafe { PAEW_Format(self.ctx.as_ptr(), DEV_INDEX) };
        check(Operation::Format, code)
    }

    fn get_address(
        &mut self,
        coin: CoinType,
        path: &DerivationPath,
        display: bool,
    ) -> Result<String> {
        self.derive(coin, path)?;

        let mut buf = [0u8; ADDRESS_CAPACITY];
        let mut len = buf.len();
        // SAFETY: the context is live, `len` holds the capacity of `buf`.
        let code = unsafe {
            PAEW_GetTradeAddress(
                self.ctx.as_ptr(),
                DEV_INDEX,
                coin.id(),
                u8::from(display),
                buf.as_mut_ptr(),
                &raw mut len,
            )
        };
        check(Operation::GetAddress, code)?;

        let address = &buf[..len.min(buf.len())];
        let end = address.iter().position(|&b| b == 0).unwrap_or(address.len());
        Ok(String::from_utf8_lossy(&address[..end]).into_owned())
    }

    /// The device always asks for confirmation before signing, whatever
    /// `display` says.
    fn sign_transaction(
        &mut self,
        path: &DerivationPath,
        payload: &[u8],
        _display: bool,
    ) -> Result<Signature> {
        self.derive(CoinType::Ethereum, path)?;

        let mut sig = [0u8; Signature::BYTE_LEN];
        let mut sig_len = sig.len();
        // SAFETY: the context is live, `payload` outlives the call and
        // `sig_len` holds the capacity of `sig`.
        let code = unsafe {
            PAEW_ETH_TXSign(
                self.ctx.as_ptr(),
                DEV_INDEX,
                payload.as_ptr(),
                payload.len(),
                sig.as_mut_ptr(),
                &raw mut sig_len,
            )
        };
        check(Operation::SignEthereum, code)?;

        Signature::from_bytes(&sig[..sig_len.min(sig.len())])
    }
}
