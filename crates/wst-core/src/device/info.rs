//! Device status snapshot.
//!
//! The device reports its state as a handful of raw bytes. This module gives
//! each of them a type with a readable rendering, while keeping values the
//! wallet does not know about (`Unknown`) so they can still be shown.
//!
//! # Example
//!
//! ```
//! use wst_core::device::{DisplayState, PinState};
//!
//! assert_eq!(PinState::from_raw(0x01), PinState::LoggedIn);
//! assert!(DisplayState::from_raw(0x01).is_idle());
//! assert_eq!(PinState::from_raw(0x7f).to_string(), "unknown (0x7f)");
//! ```

use core::fmt;

/// PIN state of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinState {
    /// The device does not report a valid PIN state.
    Invalid,
    /// A PIN is set but has not been entered.
    LoggedOut,
    /// The PIN was entered; the device accepts key operations.
    LoggedIn,
    /// Too many wrong PIN attempts.
    Locked,
    /// No PIN has been set yet.
    Unset,
    /// A value outside the known set.
    Unknown(u8),
}

impl PinState {
    /// Decodes the raw PIN state byte.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Self::LoggedOut,
            0x01 => Self::LoggedIn,
            0x02 => Self::Locked,
            0x03 => Self::Unset,
            0xFF => Self::Invalid,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw PIN state byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::LoggedOut => 0x00,
            Self::LoggedIn => 0x01,
            Self::Locked => 0x02,
            Self::Unset => 0x03,
            Self::Invalid => 0xFF,
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for PinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => f.write_str("invalid state"),
            Self::LoggedOut => f.write_str("logged out"),
            Self::LoggedIn => f.write_str("logged in"),
            Self::Locked => f.write_str("locked"),
            Self::Unset => f.write_str("unset, should set pin first"),
            Self::Unknown(raw) => write!(f, "unknown ({raw:#04x})"),
        }
    }
}

/// The network the device is provisioned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    /// Production networks.
    Formal,
    /// Test networks.
    Test,
    /// A value outside the known set.
    Unknown(u8),
}

impl ChainType {
    /// Decodes the raw chain type byte.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0x01 => Self::Formal,
            0x02 => Self::Test,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formal => f.write_str("formal net"),
            Self::Test => f.write_str("test net"),
            Self::Unknown(raw) => write!(f, "unknown ({raw:#04x})"),
        }
    }
}

/// Lifecycle stage of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// The device does not report a valid lifecycle.
    Invalid,
    /// Factory state, reserved.
    Production,
    /// No seed yet; the device accepts `init`.
    AwaitingSeed,
    /// Seed generated or imported; normal operation.
    User,
    /// A value outside the known set.
    Unknown(u8),
}

impl Lifecycle {
    /// Decodes the raw lifecycle byte.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Self::Invalid,
            0x02 => Self::AwaitingSeed,
            0x04 => Self::Production,
            0x08 => Self::User,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => f.write_str("invalid"),
            Self::Production => f.write_str("producting state, reserved"),
            Self::AwaitingSeed => f.write_str("seed not generated"),
            Self::User => f.write_str("normal state, seed generated"),
            Self::Unknown(raw) => write!(f, "unknown ({raw:#04x})"),
        }
    }
}

/// What the device screen is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayState {
    /// Nothing in particular; the device is idle.
    Idle,
    /// The vendor logo.
    Logo,
    /// A waiting indicator.
    Waiting,
    /// An OK confirmation.
    Ok,
    /// A cancel confirmation.
    Cancel,
    /// The session key hash.
    SessionKeyHash,
    /// A coin address.
    Address,
    /// Bitcoin signing details.
    BtcSign,
    /// Ethereum signing details.
    EthSign,
    /// The new PIN dialog.
    SetNewPin,
    /// The change PIN dialog.
    ChangePin,
    /// The verify PIN dialog.
    VerifyPin,
    /// The PIN locked notice.
    PinLocked,
    /// The format dialog.
    Format,
    /// The reboot notice.
    Reboot,
    /// BIP39 mnemonic words.
    ShowBip39,
    /// BIP39 mnemonic check input.
    CheckBip39,
    /// Cybex signing details.
    CybSign,
    /// The PIN error notice.
    PinError,
    /// The `M` marker.
    M,
    /// The timeout notice.
    Timeout,
    /// EOS signing details.
    EosSign,
    /// The failure notice.
    Fail,
    /// NEO signing details.
    NeoSign,
    /// The waiting timeout notice.
    WaitingTimeout,
    /// The mnemonic word count prompt.
    MnemonicCount,
    /// Mnemonic entry on the device.
    MnemonicByDevice,
    /// A value outside the known set.
    Unknown(u32),
}

impl DisplayState {
    /// Every known display state, ordered by raw value.
    const KNOWN: [Self; 27] = [
        Self::Idle,
        Self::Logo,
        Self::Waiting,
        Self::Ok,
        Self::Cancel,
        Self::SessionKeyHash,
        Self::Address,
        Self::BtcSign,
        Self::EthSign,
        Self::SetNewPin,
        Self::ChangePin,
        Self::VerifyPin,
        Self::PinLocked,
        Self::Format,
        Self::Reboot,
        Self::ShowBip39,
        Self::CheckBip39,
        Self::CybSign,
        Self::PinError,
        Self::M,
        Self::Timeout,
        Self::EosSign,
        Self::Fail,
        Self::NeoSign,
        Self::WaitingTimeout,
        Self::MnemonicCount,
        Self::MnemonicByDevice,
    ];

    /// Decodes the raw display state.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(|index| Self::KNOWN.get(index).copied())
            .unwrap_or(Self::Unknown(raw))
    }

    /// Returns the raw display state.
    #[must_use]
    pub fn raw(self) -> u32 {
        match self {
            Self::Unknown(raw) => raw,
            known => Self::KNOWN
                .iter()
                .position(|state| *state == known)
                .and_then(|index| u32::try_from(index).ok())
                .unwrap_or(u32::MAX),
        }
    }

    /// Checks whether the screen is free for a new operation.
    ///
    /// Only the idle screen and the logo qualify.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle | Self::Logo)
    }

    const fn description(self) -> &'static str {
        match self {
            Self::Idle => "normal state",
            Self::Logo => "logo is shown on screen",
            Self::Waiting => "waiting is shown on screen",
            Self::Ok => "OK is shown on screen",
            Self::Cancel => "cancel is shown on screen",
            Self::SessionKeyHash => "session key hash is shown on screen",
            Self::Address => "coin address is shown on screen",
            Self::BtcSign => "BTC sign info is shown on screen",
            Self::EthSign => "ETH sign info is shown on screen",
            Self::SetNewPin => "set new PIN is shown on screen",
            Self::ChangePin => "change PIN is shown on screen",
            Self::VerifyPin => "verify PIN is shown on screen",
            Self::PinLocked => "PIN locked is shown on screen",
            Self::Format => "format is shown on screen",
            Self::Reboot => "reboot is shown on screen",
            Self::ShowBip39 => "BIP39 mnemonics are shown on screen",
            Self::CheckBip39 => "check BIP39 mnemonics input is shown on screen",
            Self::CybSign => "CYB sign info is shown on screen",
            Self::PinError => "PIN error is shown on screen",
            Self::M => "M is shown on screen",
            Self::Timeout => "timeout is shown on screen",
            Self::EosSign => "EOS sign info is shown on screen",
            Self::Fail => "fail is shown on screen",
            Self::NeoSign => "NEO sign info is shown on screen",
            Self::WaitingTimeout => "waiting timeout is shown on screen",
            Self::MnemonicCount => "getting mnemonics number is shown on screen",
            Self::MnemonicByDevice => "getting mnemonics is shown on screen",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(raw) => write!(f, "unknown ({raw:#x})"),
            known => f.write_str(known.description()),
        }
    }
}

/// A snapshot of the device state.
///
/// Fetched fresh for every command; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// PIN state.
    pub pin_state: PinState,
    /// Provisioned network type.
    pub chain_type: ChainType,
    /// Lifecycle stage.
    pub lifecycle: Lifecycle,
    /// Serial number as reported by the device.
    pub serial_number: String,
    /// Firmware version string.
    pub firmware_version: String,
    /// Current screen content.
    pub display_state: DisplayState,
}

impl DeviceInfo {
    /// Renders the snapshot as the lines printed by the `info` command.
    #[must_use]
    pub fn summary_lines(&self) -> [String; 6] {
        [
            format!("PIN state is: {}", self.pin_state),
            format!("chain type is: {}", self.chain_type),
            format!("device sn: {}", self.serial_number),
            format!("device firmware version: {}", self.firmware_version),
            format!("lifecycle is: {}", self.lifecycle),
            format!("lcd state is: {}", self.display_state),
        ]
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary_lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_state_raw_roundtrip() {
        for raw in 0..=u8::MAX {
            assert_eq!(PinState::from_raw(raw).raw(), raw);
        }
    }

    #[test]
    fn display_state_raw_roundtrip() {
        for raw in 0..40 {
            assert_eq!(DisplayState::from_raw(raw).raw(), raw);
        }
        assert_eq!(DisplayState::from_raw(26), DisplayState::MnemonicByDevice);
        assert_eq!(DisplayState::from_raw(27), DisplayState::Unknown(27));
    }

    #[test]
    fn only_idle_and_logo_are_idle() {
        let idle: Vec<_> = DisplayState::KNOWN
            .iter()
            .filter(|state| state.is_idle())
            .collect();
        assert_eq!(idle, [&DisplayState::Idle, &DisplayState::Logo]);
        assert!(!DisplayState::Unknown(0x99).is_idle());
    }

    #[test]
    fn summary_lines() {
        let info = DeviceInfo {
            pin_state: PinState::LoggedIn,
            chain_type: ChainType::Formal,
            lifecycle: Lifecycle::User,
            serial_number: "WK0001".to_string(),
            firmware_version: "1.2.3".to_string(),
            display_state: DisplayState::Logo,
        };

        assert_eq!(
            info.summary_lines(),
            [
                "PIN state is: logged in",
                "chain type is: formal net",
                "device sn: WK0001",
                "device firmware version: 1.2.3",
                "lifecycle is: normal state, seed generated",
                "lcd state is: logo is shown on screen",
            ]
        );
    }

    #[test]
    fn lifecycle_strings() {
        assert_eq!(Lifecycle::from_raw(0x02).to_string(), "seed not generated");
        assert_eq!(Lifecycle::from_raw(0x04).to_string(), "producting state, reserved");
        assert_eq!(Lifecycle::from_raw(0x08).to_string(), "normal state, seed generated");
    }

    #[test]
    fn unknown_values_keep_raw() {
        assert_eq!(ChainType::from_raw(9).to_string(), "unknown (0x09)");
        assert_eq!(Lifecycle::from_raw(0x10), Lifecycle::Unknown(0x10));
        assert_eq!(DisplayState::Unknown(0x2a).to_string(), "unknown (0x2a)");
    }
}
