use std::time::Duration;

use clap::Parser;
use wst_core::WalletConfig;
use wst_core::rpc::HttpRpcConfig;

/// WOOKONG Solo Tutorial Wallet: an interactive Ethereum wallet backed by a
/// WOOKONG Solo hardware device.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ethereum JSON-RPC endpoint
    #[arg(long, env = "WST_RPC_URL", default_value = HttpRpcConfig::DEFAULT_URL)]
    pub rpc_url: String,

    /// Timeout of each RPC request, in seconds
    #[arg(long, env = "WST_RPC_TIMEOUT_SECS", default_value_t = 30)]
    pub rpc_timeout_secs: u64,

    /// Block explorer prefix for transaction links
    #[arg(long, env = "WST_EXPLORER_URL", default_value = WalletConfig::DEFAULT_EXPLORER_TX_URL)]
    pub explorer_url: String,
}

impl Cli {
    /// Returns the RPC client settings.
    #[must_use]
    pub fn rpc_config(&self) -> HttpRpcConfig {
        HttpRpcConfig {
            url: self.rpc_url.clone(),
            timeout: Duration::from_secs(self.rpc_timeout_secs),
        }
    }

    /// Returns the wallet settings.
    #[must_use]
    pub fn wallet_config(&self) -> WalletConfig {
        WalletConfig {
            explorer_tx_url: self.explorer_url.clone(),
            ..WalletConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "wst",
            "--rpc-url",
            "http://localhost:8545",
            "--rpc-timeout-secs",
            "5",
            "--explorer-url",
            "https://sepolia.etherscan.io/tx/",
        ])
        .unwrap();

        let rpc = cli.rpc_config();
        assert_eq!(rpc.url, "http://localhost:8545");
        assert_eq!(rpc.timeout, Duration::from_secs(5));
        assert_eq!(
            cli.wallet_config().explorer_tx_url,
            "https://sepolia.etherscan.io/tx/"
        );
        assert_eq!(cli.wallet_config().chain_id, 1);
    }
}
