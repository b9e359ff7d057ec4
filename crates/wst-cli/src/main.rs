use std::io;

// Only used by the library
use thiserror as _;
use tracing_subscriber as _;

use anyhow::Context;
use clap::Parser;
use wst_cli::{Cli, init_logging, run};
use wst_core::Wallet;
use wst_core::device::EWalletDevice;
use wst_core::rpc::HttpRpc;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging();
    tracing::info!("CLI initialized with args: {:?}", args);

    let device = EWalletDevice::open().context("Is the WOOKONG Solo plugged in?")?;
    let rpc = HttpRpc::new(&args.rpc_config())
        .with_context(|| format!("cannot create RPC client for {}", args.rpc_url))?;
    let mut wallet = Wallet::new(device, rpc, args.wallet_config());

    let stdin = io::stdin();
    run(&mut wallet, stdin.lock(), io::stdout().lock())?;
    Ok(())
}
