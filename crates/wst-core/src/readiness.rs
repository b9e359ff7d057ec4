//! Device readiness gate.
//!
//! Address derivation, balance lookups and signing all require a device with
//! the PIN entered and nothing else on its screen. The gate is evaluated on a
//! fresh [`DeviceInfo`] right before each such operation; the user can lock
//! the device or start something on it between two commands.

use tracing::debug;

use crate::device::{Device, DeviceInfo, PinState};
use crate::error::{Error, Operation, Result};

/// Checks a status snapshot against the readiness rules.
///
/// The PIN check comes first, so a locked device is reported as such even when
/// its screen is busy.
///
/// # Errors
///
/// - [`Error::PinNotUnlocked`] if the PIN state is anything but logged in
/// - [`Error::DisplayBusy`] if the screen is neither idle nor showing the logo
pub fn check(info: &DeviceInfo) -> Result<()> {
    if info.pin_state != PinState::LoggedIn {
        debug!(pin_state = %info.pin_state, "device not ready");
        return Err(Error::PinNotUnlocked);
    }

    if !info.display_state.is_idle() {
        debug!(display_state = %info.display_state, "device not ready");
        return Err(Error::DisplayBusy(info.display_state));
    }

    Ok(())
}

/// Queries the device and runs [`check`] on the answer.
///
/// Returns the snapshot the decision was based on.
///
/// # Errors
///
/// Returns [`Error::DeviceUnavailable`] if the status query fails, otherwise
/// whatever [`check`] reports.
pub fn ensure_ready<D: Device + ?Sized>(device: &mut D) -> Result<DeviceInfo> {
    let info = device.device_info().map_err(unavailable)?;
    check(&info)?;
    Ok(info)
}

/// Maps a failed status query to [`Error::DeviceUnavailable`].
pub(crate) fn unavailable(err: Error) -> Error {
    match err {
        Error::Device {
            operation: Operation::GetDeviceInfo,
            code,
        } => Error::DeviceUnavailable(code),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::ReturnCode;
    use crate::device::{ChainType, DisplayState, Lifecycle};
    use crate::testing::MockDevice;

    fn info(pin_state: PinState, display_state: DisplayState) -> DeviceInfo {
        DeviceInfo {
            pin_state,
            chain_type: ChainType::Formal,
            lifecycle: Lifecycle::User,
            serial_number: "WK0001".to_string(),
            firmware_version: "1.0.0".to_string(),
            display_state,
        }
    }

    #[test]
    fn ready_when_logged_in_and_idle() {
        for display in [DisplayState::Idle, DisplayState::Logo] {
            assert!(check(&info(PinState::LoggedIn, display)).is_ok());
        }
    }

    #[test]
    fn pin_is_checked_first() {
        for pin in [
            PinState::LoggedOut,
            PinState::Locked,
            PinState::Unset,
            PinState::Invalid,
            PinState::Unknown(0x42),
        ] {
            for display in [DisplayState::Logo, DisplayState::EthSign] {
                let err = check(&info(pin, display)).unwrap_err();
                assert!(matches!(err, Error::PinNotUnlocked), "{pin:?} {display:?}");
            }
        }
    }

    #[test]
    fn busy_display_is_rejected() {
        for raw in 2..40 {
            let display = DisplayState::from_raw(raw);
            let err = check(&info(PinState::LoggedIn, display)).unwrap_err();
            assert!(matches!(err, Error::DisplayBusy(d) if d == display));
        }
    }

    #[test]
    fn failed_query_is_unavailable() {
        let mut device = MockDevice::new().fail_device_info(ReturnCode::DevOpenFail.raw());
        let err = ensure_ready(&mut device).unwrap_err();
        assert!(matches!(err, Error::DeviceUnavailable(code) if code == ReturnCode::DevOpenFail.raw()));
        assert_eq!(
            err.to_string(),
            "get device info failed: open device failed"
        );
    }

    #[test]
    fn ensure_ready_returns_snapshot() {
        let mut device = MockDevice::new();
        let snapshot = ensure_ready(&mut device).unwrap();
        assert_eq!(snapshot.pin_state, PinState::LoggedIn);
    }
}
