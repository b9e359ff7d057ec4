//! The interactive read-dispatch-print loop.
//!
//! One command is read, fully executed and reported before the next line is
//! read. A failing command prints its error and the session goes on; only
//! `exit` or the end of input end it.

use std::io::{self, BufRead, Write};

use tracing::{info, warn};
use wst_core::{ChainRpc, Device, Wallet};

use crate::command::{Command, CommandError};

/// Printed at start-up and by `help`.
pub const USAGE: &str = "\
Welcome to WOOKONG Solo Tutorial Wallet(WST)!
USAGE:
info
init (generate <seed_len>)|import
format
addr <derive_path>
balance <derive_path>
send <derive_path> <to> <value>
help
exit
Example
init generate 32
send [0,2147483692,2147483708,2147483648,0,0] 0x7F825230F5F2A26523999c98e0E3f7E2697085A9 0.00001";

/// Shown before each input line.
pub const PROMPT: &str = "WST> ";

/// Printed when the session ends.
pub const FAREWELL: &str = "Thank you for using WST wallet, bye!";

/// Whether the loop should read another line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Runs the session until `exit` or end of input.
///
/// # Errors
///
/// Returns an error only if reading `input` or writing `output` fails.
pub fn run<D, R>(
    wallet: &mut Wallet<D, R>,
    mut input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()>
where
    D: Device,
    R: ChainRpc,
{
    writeln!(output, "{USAGE}")?;

    let mut buf = Vec::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(output)?;
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        if dispatch(wallet, &line, &mut output)? == Flow::Exit {
            break;
        }
    }

    writeln!(output, "{FAREWELL}")?;
    info!("session closed");
    Ok(())
}

/// Parses and executes one line, printing the outcome.
fn dispatch<D, R>(
    wallet: &mut Wallet<D, R>,
    line: &str,
    output: &mut impl Write,
) -> io::Result<Flow>
where
    D: Device,
    R: ChainRpc,
{
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(Flow::Continue),
        Err(err) => {
            report(&err, output)?;
            return Ok(Flow::Continue);
        }
    };

    match command {
        Command::Exit => return Ok(Flow::Exit),
        Command::Help => writeln!(output, "{USAGE}")?,
        command => match execute(wallet, command) {
            Ok(text) => writeln!(output, "{text}")?,
            Err(err) => report(&err.into(), output)?,
        },
    }

    Ok(Flow::Continue)
}

/// Runs a wallet command and renders its outcome.
fn execute<D, R>(wallet: &mut Wallet<D, R>, command: Command) -> wst_core::Result<String>
where
    D: Device,
    R: ChainRpc,
{
    let ticker = wallet.config().coin_type.ticker();

    let text = match command {
        Command::Info => wallet.device_info()?.to_string(),
        Command::Init(mode) => {
            wallet.init(mode)?;
            format!("{} completed successfully", mode.name())
        }
        Command::Format => {
            wallet.format()?;
            "format completed successfully".to_string()
        }
        Command::Addr(path) => {
            let resolved = wallet.address(&path, true)?;
            format!("your {ticker} address is: {}", resolved.address)
        }
        Command::Balance(path) => {
            let balance = wallet.balance(&path)?;
            format!(
                "your {ticker} address is: {}, balance is: {} Ether",
                balance.address,
                balance.ether()
            )
        }
        Command::Send { path, to, value } => {
            let receipt = wallet.send(&path, to, value)?;
            [
                "transaction succeeded.".to_string(),
                format!("from: {}", receipt.from),
                format!("to: {}", receipt.transaction.to),
                format!("value: {} Ether", receipt.value_ether()),
                format!("gas price: {} Wei", receipt.transaction.gas_price),
                format!("gas limit: {}", receipt.transaction.gas_limit),
                format!(
                    "you can see your transaction detail here: {}",
                    receipt.explorer_url
                ),
            ]
            .join("\n")
        }
        Command::Help | Command::Exit => unreachable!("handled by dispatch"),
    };

    Ok(text)
}

fn report(err: &CommandError, output: &mut impl Write) -> io::Result<()> {
    warn!(error = %err, "command failed");
    writeln!(output, "{err}")
}
