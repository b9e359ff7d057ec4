//! Parsing of REPL input lines.
//!
//! A line is split on whitespace; the first token names the command and the
//! rest are its arguments. Tokens past the ones a command needs are ignored.

use thiserror::Error;
use wst_core::units::parse_ether;
use wst_core::{Address, DerivationPath, InitMode, U256};

/// A parsed REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the device status.
    Info,
    /// Give a fresh device its seed.
    Init(InitMode),
    /// Wipe the device.
    Format,
    /// Show the address at a path, on screen and on the device.
    Addr(DerivationPath),
    /// Look up the balance of the address at a path.
    Balance(DerivationPath),
    /// Transfer ether from the address at a path.
    Send {
        /// Sender key path.
        path: DerivationPath,
        /// Recipient.
        to: Address,
        /// Amount in wei.
        value: U256,
    },
    /// Print the usage banner.
    Help,
    /// Leave the session.
    Exit,
}

/// Errors raised while parsing a command line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommandError {
    /// The first token is not a known command.
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    /// A required argument is absent.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// `init` was given something other than `generate` or `import`.
    #[error("unknown parameter: {0}")]
    UnknownInitMode(String),

    /// The seed length is not a number between 0 and 255.
    #[error("invalid seed length: {0}")]
    InvalidSeedLength(String),

    /// An argument failed core validation.
    #[error(transparent)]
    Core(#[from] wst_core::Error),
}

impl Command {
    /// Parses one input line.
    ///
    /// Returns `Ok(None)` for a blank line.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing the first problem found.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };

        let command = match name {
            "info" => Self::Info,
            "init" => Self::Init(parse_init(&mut tokens)?),
            "format" => Self::Format,
            "addr" => Self::Addr(parse_path(tokens.next())?),
            "balance" => Self::Balance(parse_path(tokens.next())?),
            "send" => {
                let path = parse_path(tokens.next())?;
                let to = tokens
                    .next()
                    .ok_or(CommandError::MissingArgument("recipient address"))?
                    .parse()?;
                let value = parse_ether(
                    tokens
                        .next()
                        .ok_or(CommandError::MissingArgument("ether value"))?,
                )?;
                Self::Send { path, to, value }
            }
            "help" => Self::Help,
            "exit" => Self::Exit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn parse_path(token: Option<&str>) -> Result<DerivationPath, CommandError> {
    let token = token.ok_or(CommandError::MissingArgument("derivation path"))?;
    Ok(token.parse()?)
}

fn parse_init<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<InitMode, CommandError> {
    match tokens.next() {
        Some("generate") => {
            let len = tokens
                .next()
                .ok_or(CommandError::MissingArgument("seed length"))?;
            let seed_len = len
                .parse()
                .map_err(|_| CommandError::InvalidSeedLength(len.to_string()))?;
            Ok(InitMode::Generate { seed_len })
        }
        Some("import") => Ok(InitMode::Import),
        Some(other) => Err(CommandError::UnknownInitMode(other.to_string())),
        None => Err(CommandError::MissingArgument("init mode")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "[0,2147483692,2147483708,2147483648,0,0]";

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn blank_lines() {
        assert!(Command::parse("").unwrap().is_none());
        assert!(Command::parse("   \t ").unwrap().is_none());
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("info"), Command::Info);
        assert_eq!(parse("  format  "), Command::Format);
        assert_eq!(parse("help"), Command::Help);
        assert_eq!(parse("exit"), Command::Exit);
    }

    #[test]
    fn init_modes() {
        assert_eq!(
            parse("init generate 32"),
            Command::Init(InitMode::Generate { seed_len: 32 })
        );
        assert_eq!(parse("init import"), Command::Init(InitMode::Import));

        let err = Command::parse("init restore").unwrap_err();
        assert_eq!(err.to_string(), "unknown parameter: restore");

        let err = Command::parse("init generate lots").unwrap_err();
        assert!(matches!(err, CommandError::InvalidSeedLength(_)));

        let err = Command::parse("init").unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument("init mode")));
    }

    #[test]
    fn path_commands() {
        let path: DerivationPath = PATH.parse().unwrap();
        assert_eq!(parse(&format!("addr {PATH}")), Command::Addr(path.clone()));
        assert_eq!(parse(&format!("balance {PATH}")), Command::Balance(path));

        let err = Command::parse("addr [1,2]").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Core(wst_core::Error::InvalidDerivationPath(_))
        ));

        let err = Command::parse("balance").unwrap_err();
        assert_eq!(err.to_string(), "missing argument: derivation path");
    }

    #[test]
    fn send_arguments() {
        let line = format!("send {PATH} 0x7F825230F5F2A26523999c98e0E3f7E2697085A9 0.00001");
        let Command::Send { path, to, value } = parse(&line) else {
            panic!("expected send");
        };

        assert_eq!(path.len(), 6);
        assert_eq!(to.to_hex(), "0x7f825230f5f2a26523999c98e0e3f7e2697085a9");
        assert_eq!(value, U256::from(10_000_000_000_000u64));
    }

    #[test]
    fn send_rejects_bad_arguments() {
        let err = Command::parse(&format!("send {PATH} 0x1234 1")).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Core(wst_core::Error::InvalidAddress(_))
        ));

        let line = format!("send {PATH} 0x7F825230F5F2A26523999c98e0E3f7E2697085A9 lots");
        let err = Command::parse(&line).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Core(wst_core::Error::InvalidAmount(_))
        ));

        let err = Command::parse(&format!("send {PATH}")).unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument("recipient address")));
    }

    #[test]
    fn unknown_command() {
        let err = Command::parse("transfer 1 2").unwrap_err();
        assert_eq!(err.to_string(), "unknown command: 'transfer'");
    }
}
