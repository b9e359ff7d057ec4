//! WOOKONG Solo Tutorial Wallet command line.
//!
//! The `wst` binary opens the hardware device through the vendor library,
//! connects to an Ethereum JSON-RPC endpoint, and runs an interactive session
//! where each line is one command:
//!
//! ```text
//! info
//! init (generate <seed_len>)|import
//! format
//! addr <derive_path>
//! balance <derive_path>
//! send <derive_path> <to> <value>
//! help
//! exit
//! ```
//!
//! Derivation paths are JSON arrays starting with the root marker `0`, e.g.
//! `[0,2147483692,2147483708,2147483648,0,0]` for `m/44'/60'/0'/0/0`.
//!
//! Everything the session prints goes to stdout; logs go to stderr and are
//! filtered with `RUST_LOG` (default `warn`).

#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Only used by the binary and integration tests
use anyhow as _;
#[cfg(test)]
use {alloy_primitives as _, alloy_rlp as _, hex as _};

mod args;
mod command;
mod repl;

pub use args::Cli;
pub use command::{Command, CommandError};
pub use repl::{FAREWELL, PROMPT, USAGE, run};

/// Installs the stderr log subscriber.
///
/// Calling it again is harmless.
pub fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => tracing::debug!("logging initialized"),
        Err(_) => tracing::debug!("logging already initialized"),
    }
}
