//! Return codes of the vendor library and their human-readable descriptions.
//!
//! Every call into the device library yields a 32-bit return code. The known
//! codes form the closed set [`ReturnCode`]; [`describe`] turns any raw value,
//! known or not, into the sentence shown to the user.
//!
//! # Example
//!
//! ```
//! use wst_core::code::{ReturnCode, describe};
//!
//! assert_eq!(ReturnCode::DevPinLocked.description(), "PIN locked");
//! assert_eq!(describe(0x8000_0008), "operation canceled");
//! assert_eq!(describe(0x42), "unknown return code: 0x42");
//! ```

use std::borrow::Cow;
use std::fmt;

/// A return code known to the vendor library.
///
/// Values follow the declaration order of the vendor header: success is zero
/// and every failure sets the high bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ReturnCode {
    /// The call completed.
    Success = 0x0000_0000,
    /// Unclassified failure.
    UnknownFail = 0x8000_0001,
    /// An argument was rejected by the library.
    ArgumentBad = 0x8000_0002,
    /// Host memory allocation failed.
    HostMemory = 0x8000_0003,
    /// Device enumeration failed.
    DevEnumFail = 0x8000_0004,
    /// The device could not be opened.
    DevOpenFail = 0x8000_0005,
    /// Communication with the device failed.
    DevCommunicateFail = 0x8000_0006,
    /// The PIN must be entered on the device first.
    DevNeedPin = 0x8000_0007,
    /// The user canceled on the device.
    DevOpCancel = 0x8000_0008,
    /// The operation needs a restored seed.
    DevKeyNotRestored = 0x8000_0009,
    /// A seed is already present.
    DevKeyAlreadyRestored = 0x8000_000A,
    /// Wrong number of connected devices.
    DevCountBad = 0x8000_000B,
    /// The device answer is too short or malformed.
    DevRetdataInvalid = 0x8000_000C,
    /// Device authentication failed.
    DevAuthFail = 0x8000_000D,
    /// Lifecycle or device state does not allow the operation.
    DevStateInvalid = 0x8000_000E,
    /// The device is waiting.
    DevWaiting = 0x8000_000F,
    /// Command not recognized by the device.
    DevCommandInvalid = 0x8000_0010,
    /// The device status word was not `9000`.
    DevRunCommandFail = 0x8000_0011,
    /// Invalid device handle.
    DevHandleInvalid = 0x8000_0012,
    /// Unknown COS type value.
    CosTypeInvalid = 0x8000_0013,
    /// COS type does not match the operation.
    CosTypeNotMatch = 0x8000_0014,
    /// Bad Shamir split.
    DevBadShamirSplit = 0x8000_0015,
    /// Dragon ball devices are not in one group.
    DevNotOneGroup = 0x8000_0016,
    /// Output buffer too small.
    BufferTooSmall = 0x8000_0017,
    /// The transaction could not be parsed.
    TxParseFail = 0x8000_0018,
    /// Input and UTXO counts differ.
    TxUtxoNeq = 0x8000_0019,
    /// More than 100 transaction inputs.
    TxInputTooMany = 0x8000_001A,
    /// Library mutex failure.
    MutexError = 0x8000_001B,
    /// Unknown coin type.
    CoinTypeInvalid = 0x8000_001C,
    /// Coin type differs from the one used for derivation.
    CoinTypeNotMatch = 0x8000_001D,
    /// The derivation path does not start at the root.
    DerivePathInvalid = 0x8000_001E,
    /// Call not supported.
    NotSupported = 0x8000_001F,
    /// Library internal error.
    InternalError = 0x8000_0020,
    /// Invalid N or T.
    BadNT = 0x8000_0021,
    /// No target device selected.
    TargetDevInvalid = 0x8000_0022,
    /// Cryptographic failure.
    CryptoError = 0x8000_0023,
    /// The operation timed out.
    DevTimeout = 0x8000_0024,
    /// The PIN is locked.
    DevPinLocked = 0x8000_0025,
    /// New PIN confirmation mismatch.
    DevPinConfirmFail = 0x8000_0026,
    /// Wrong PIN.
    DevPinVerifyFail = 0x8000_0027,
    /// Device-side data check (CRC) failed.
    DevCheckdataFail = 0x8000_0028,
    /// The user is operating the device.
    DevDevOperating = 0x8000_0029,
    /// No PIN set.
    DevPinUninit = 0x8000_002A,
    /// A previous device operation is still running.
    DevBusy = 0x8000_002B,
    /// The device is already available.
    DevAlreadyAvailable = 0x8000_002C,
    /// Requested data not found.
    DevDataNotFound = 0x8000_002D,
    /// Sensor error.
    DevSensorError = 0x8000_002E,
    /// Device storage error.
    DevStorageError = 0x8000_002F,
    /// Device storage full.
    DevStorageFull = 0x8000_0030,
    /// Fingerprint verify or enroll error.
    DevFpCommonError = 0x8000_0031,
    /// Redundant fingerprint.
    DevFpRedundant = 0x8000_0032,
    /// Fingerprint enroll step succeeded.
    DevFpGoodFinger = 0x8000_0033,
    /// No fingerprint detected.
    DevFpNoFinger = 0x8000_0034,
    /// Partial fingerprint image.
    DevFpNotFullFinger = 0x8000_0035,
    /// Invalid fingerprint image.
    DevFpBadImage = 0x8000_0036,
    /// Battery too low.
    DevLowPower = 0x8000_0037,
    /// Invalid device type.
    DevTypeInvalid = 0x8000_0038,
    /// Signature verification count exhausted.
    NoVerifyCount = 0x8000_0039,
    /// Reserved.
    AuthCancel = 0x8000_003A,
    /// PIN length out of range.
    PinLenError = 0x8000_003B,
    /// Invalid authentication type.
    AuthTypeInvalid = 0x8000_003C,
    /// User-defined device function invalid.
    DevFuncInvalid = 0x8000_003D,
}

impl ReturnCode {
    /// Every known return code, in declaration order.
    pub const ALL: [Self; 62] = [
        Self::Success,
        Self::UnknownFail,
        Self::ArgumentBad,
        Self::HostMemory,
        Self::DevEnumFail,
        Self::DevOpenFail,
        Self::DevCommunicateFail,
        Self::DevNeedPin,
        Self::DevOpCancel,
        Self::DevKeyNotRestored,
        Self::DevKeyAlreadyRestored,
        Self::DevCountBad,
        Self::DevRetdataInvalid,
        Self::DevAuthFail,
        Self::DevStateInvalid,
        Self::DevWaiting,
        Self::DevCommandInvalid,
        Self::DevRunCommandFail,
        Self::DevHandleInvalid,
        Self::CosTypeInvalid,
        Self::CosTypeNotMatch,
        Self::DevBadShamirSplit,
        Self::DevNotOneGroup,
        Self::BufferTooSmall,
        Self::TxParseFail,
        Self::TxUtxoNeq,
        Self::TxInputTooMany,
        Self::MutexError,
        Self::CoinTypeInvalid,
        Self::CoinTypeNotMatch,
        Self::DerivePathInvalid,
        Self::NotSupported,
        Self::InternalError,
        Self::BadNT,
        Self::TargetDevInvalid,
        Self::CryptoError,
        Self::DevTimeout,
        Self::DevPinLocked,
        Self::DevPinConfirmFail,
        Self::DevPinVerifyFail,
        Self::DevCheckdataFail,
        Self::DevDevOperating,
        Self::DevPinUninit,
        Self::DevBusy,
        Self::DevAlreadyAvailable,
        Self::DevDataNotFound,
        Self::DevSensorError,
        Self::DevStorageError,
        Self::DevStorageFull,
        Self::DevFpCommonError,
        Self::DevFpRedundant,
        Self::DevFpGoodFinger,
        Self::DevFpNoFinger,
        Self::DevFpNotFullFinger,
        Self::DevFpBadImage,
        Self::DevLowPower,
        Self::DevTypeInvalid,
        Self::NoVerifyCount,
        Self::AuthCancel,
        Self::PinLenError,
        Self::AuthTypeInvalid,
        Self::DevFuncInvalid,
    ];

    /// Returns the raw value passed over the library boundary.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Looks up the known code for a raw value.
    ///
    /// Returns `None` for values outside the closed set.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.raw() == raw)
    }

    /// Checks whether this code reports success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns the fixed description of this code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::UnknownFail => "unknown failure",
            Self::ArgumentBad => "argument bad",
            Self::HostMemory => "malloc memory failed",
            Self::DevEnumFail => "enum device failed",
            Self::DevOpenFail => "open device failed",
            Self::DevCommunicateFail => "communicate failed",
            Self::DevNeedPin => "device need user input pin to \"unlock\"",
            Self::DevOpCancel => "operation canceled",
            Self::DevKeyNotRestored => "operation need seed restored while current state is not restored",
            Self::DevKeyAlreadyRestored => "seed already restored",
            Self::DevCountBad => "errors such as no device, or device count must equal to N when init, device count must >=T and <=N when restore or sign",
            Self::DevRetdataInvalid => "received data length less than 2 or ret data structure invalid",
            Self::DevAuthFail => "device authentication failed",
            Self::DevStateInvalid => "life cycle or other device state not matched to current operation",
            Self::DevWaiting => "device waiting",
            Self::DevCommandInvalid => "command can not recognized by device",
            Self::DevRunCommandFail => "received data not 9000",
            Self::DevHandleInvalid => "device handle invalid",
            Self::CosTypeInvalid => "device cos type value must be DEV_INFO_COS_TYPE_XXX",
            Self::CosTypeNotMatch => "device cos type not matched to current operation, such as dragon ball spec function calls personal e-wallet, or passed argument implies specific cos type while current cos type not match, or current insert devices' types are not the same",
            Self::DevBadShamirSplit => "bad shamir split",
            Self::DevNotOneGroup => "dragon ball device is not belong to one group",
            Self::BufferTooSmall => "size of input buffer not enough to store return data",
            Self::TxParseFail => "input transaction parse failed",
            Self::TxUtxoNeq => "count of input and UTXO is not equal",
            Self::TxInputTooMany => "input count shouldn't larger than 100",
            Self::MutexError => "mutex error, such as create/free/lock/unlock",
            Self::CoinTypeInvalid => "value of coin type must be COIN_TYPE_XXX",
            Self::CoinTypeNotMatch => "value of coin type must be equal to the value passed to DeriveTradeAddress",
            Self::DerivePathInvalid => "derive path must start by 0x00000000, indicates m",
            Self::NotSupported => "call not supported",
            Self::InternalError => "library internal errors, such as internal structure definition mistake",
            Self::BadNT => "value of N or T is invalid",
            Self::TargetDevInvalid => "when getting address or signing, dragon ball must select a target device by calling DeriveTradeAddress successfully first",
            Self::CryptoError => "crypto error",
            Self::DevTimeout => "operation time out",
            Self::DevPinLocked => "PIN locked",
            Self::DevPinConfirmFail => "set new pin error when confirm",
            Self::DevPinVerifyFail => "input pin error when change pin or do other operation",
            Self::DevCheckdataFail => "input data check failed in device, usually caused by invalid CRC check",
            Self::DevDevOperating => "user is operating device, please wait",
            Self::DevPinUninit => "PIN not initialized",
            Self::DevBusy => "device is busy, such as when enroll or verify finger print, previous operation is not finished yet",
            Self::DevAlreadyAvailable => "device is available, not need to abort again",
            Self::DevDataNotFound => "required data is not found",
            Self::DevSensorError => "sensor (such as finger print sensor) error",
            Self::DevStorageError => "device storage error",
            Self::DevStorageFull => "device storage full",
            Self::DevFpCommonError => "finger print common error (such as finger print verify or enroll error)",
            Self::DevFpRedundant => "finger print redundant error",
            Self::DevFpGoodFinger => "finger print enroll step success",
            Self::DevFpNoFinger => "sensor haven't got any finger print",
            Self::DevFpNotFullFinger => "sensor haven't got full finger print image",
            Self::DevFpBadImage => "sensor haven't got valid image",
            Self::DevLowPower => "device power is too low",
            Self::DevTypeInvalid => "invalid device type",
            Self::NoVerifyCount => "count of verification run out when doing signature",
            Self::AuthCancel => "not used yet",
            Self::PinLenError => "PIN length error",
            Self::AuthTypeInvalid => "authenticate type invalid",
            Self::DevFuncInvalid => "user-defined device function invalid",
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Describes a raw return code.
///
/// Known codes map to their fixed description, anything else to a fallback
/// that embeds the raw value.
#[must_use]
pub fn describe(raw: u32) -> Cow<'static, str> {
    match ReturnCode::from_raw(raw) {
        Some(code) => Cow::Borrowed(code.description()),
        None => Cow::Owned(format!("unknown return code: {raw:#x}")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn raw_values_are_unique() {
        let raws: HashSet<u32> = ReturnCode::ALL.iter().map(|code| code.raw()).collect();
        assert_eq!(raws.len(), ReturnCode::ALL.len());
    }

    #[test]
    fn every_known_code_round_trips_through_raw() {
        for code in ReturnCode::ALL {
            assert_eq!(ReturnCode::from_raw(code.raw()), Some(code));
            assert_eq!(describe(code.raw()), code.description());
        }
    }

    #[test]
    fn descriptions() {
        assert_eq!(describe(0), "success");
        assert_eq!(ReturnCode::DevOpCancel.description(), "operation canceled");
        assert_eq!(ReturnCode::DevTimeout.description(), "operation time out");
        assert_eq!(
            ReturnCode::DerivePathInvalid.description(),
            "derive path must start by 0x00000000, indicates m"
        );
        assert_eq!(ReturnCode::DevStorageFull.to_string(), "device storage full");
        assert!(
            ReturnCode::CosTypeNotMatch
                .description()
                .contains("such as dragon ball spec function calls personal e-wallet")
        );
    }

    #[test]
    fn unknown_code_embeds_raw_value() {
        let text = describe(0x8000_7777);
        assert_eq!(text, "unknown return code: 0x80007777");
        assert!(matches!(text, Cow::Owned(_)));
    }

    #[test]
    fn describe_is_stable() {
        for raw in [0, 0x8000_0001, 0x8000_0024, 0xdead_beef] {
            assert_eq!(describe(raw), describe(raw));
        }
    }

    #[test]
    fn only_success_is_success() {
        let successes = ReturnCode::ALL.iter().filter(|code| code.is_success()).count();
        assert_eq!(successes, 1);
    }
}
