//! Ethereum JSON-RPC access.
//!
//! The wallet needs four calls from a node: the sender's nonce, the current
//! gas price, an account balance and raw transaction broadcast. They sit
//! behind the [`ChainRpc`] trait so workflows can run against a test double.
//! [`HttpRpc`] is the JSON-RPC 2.0 over HTTP implementation used by the
//! binary.

use std::time::Duration;

use alloy_primitives::U256;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Block tag used for state queries.
const LATEST: &str = "latest";

/// The chain queries the wallet needs.
///
/// Addresses are passed as the `0x`-prefixed hex string the device reported.
pub trait ChainRpc {
    /// Returns the number of transactions sent from `address`.
    fn transaction_count(&self, address: &str) -> Result<u64>;

    /// Returns the node's current gas price in wei.
    fn gas_price(&self) -> Result<U256>;

    /// Returns the balance of `address` in wei.
    fn balance(&self, address: &str) -> Result<U256>;

    /// Broadcasts a signed `0x`-prefixed raw transaction and returns its hash.
    fn send_raw_transaction(&self, raw: &str) -> Result<String>;
}

/// Connection settings for [`HttpRpc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRpcConfig {
    /// Endpoint receiving the JSON-RPC POST requests.
    pub url: String,
    /// Timeout applied to each request.
    pub timeout: Duration,
}

impl HttpRpcConfig {
    /// The endpoint used when none is configured.
    pub const DEFAULT_URL: &'static str = "https://mainnet.infura.io";

    /// The request timeout used when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for HttpRpcConfig {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Blocking JSON-RPC client for an Ethereum node.
#[derive(Debug, Clone)]
pub struct HttpRpc {
    inner: Client,
    url: String,
}

impl HttpRpc {
    /// Builds a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rpc`] if the HTTP client cannot be built.
    pub fn new(config: &HttpRpcConfig) -> Result<Self> {
        let inner = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            inner,
            url: config.url.clone(),
        })
    }

    /// Returns the endpoint used by the client.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.url
    }

    /// Issues a raw JSON-RPC call returning the untyped result.
    fn request(&self, method: &str, params: Value) -> Result<Value> {
        debug!(method, "sending RPC request");
        let payload = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: 1,
            method,
            params,
        };

        let response = self.inner.post(&self.url).json(&payload).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Rpc(format!("{method}: HTTP status {status}")));
        }

        let response: JsonRpcResponse = response.json()?;
        if let Some(error) = response.error {
            return Err(Error::RpcResponse {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .ok_or_else(|| Error::MalformedRpcResult(format!("{method}: empty result")))
    }

    /// Issues a JSON-RPC call and deserialises the result into `R`.
    fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R> {
        let value = self.request(method, params)?;
        serde_json::from_value(value)
            .map_err(|e| Error::MalformedRpcResult(format!("{method}: {e}")))
    }
}

impl ChainRpc for HttpRpc {
    fn transaction_count(&self, address: &str) -> Result<u64> {
        let count: String = self.call(
            "eth_getTransactionCount",
            Value::from(vec![address, LATEST]),
        )?;
        parse_quantity_u64(&count)
    }

    fn gas_price(&self) -> Result<U256> {
        let price: String = self.call("eth_gasPrice", Value::Array(vec![]))?;
        parse_quantity(&price)
    }

    fn balance(&self, address: &str) -> Result<U256> {
        let balance: String = self.call("eth_getBalance", Value::from(vec![address, LATEST]))?;
        parse_quantity(&balance)
    }

    fn send_raw_transaction(&self, raw: &str) -> Result<String> {
        let hash: String = self.call("eth_sendRawTransaction", Value::from(vec![raw]))?;
        debug!(%hash, "transaction broadcast");
        Ok(hash)
    }
}

/// Strips the `0x` prefix of a hex quantity, rejecting empty digits.
fn quantity_digits(quantity: &str) -> Result<&str> {
    quantity
        .strip_prefix("0x")
        .filter(|digits| !digits.is_empty())
        .ok_or_else(|| Error::MalformedRpcResult(format!("not a hex quantity: {quantity:?}")))
}

/// Parses a JSON-RPC hex quantity such as `"0x4a817c800"`.
///
/// # Errors
///
/// Returns [`Error::MalformedRpcResult`] if the string is not a `0x`-prefixed
/// hex number that fits in 256 bits.
pub fn parse_quantity(quantity: &str) -> Result<U256> {
    let digits = quantity_digits(quantity)?;
    U256::from_str_radix(digits, 16)
        .map_err(|e| Error::MalformedRpcResult(format!("{quantity:?}: {e}")))
}

/// Parses a JSON-RPC hex quantity that must fit in a `u64`.
///
/// # Errors
///
/// Returns [`Error::MalformedRpcResult`] if the string is not a `0x`-prefixed
/// hex number that fits in 64 bits.
pub fn parse_quantity_u64(quantity: &str) -> Result<u64> {
    let digits = quantity_digits(quantity)?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| Error::MalformedRpcResult(format!("{quantity:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_quantities() {
        assert_eq!(parse_quantity("0x0").unwrap(), U256::ZERO);
        assert_eq!(
            parse_quantity("0x4a817c800").unwrap(),
            U256::from(20_000_000_000u64)
        );
        assert_eq!(parse_quantity_u64("0x5").unwrap(), 5);
        assert_eq!(parse_quantity_u64("0xFF").unwrap(), 255);
    }

    #[test]
    fn parse_quantity_rejects_garbage() {
        for bad in ["", "0x", "12", "0xzz"] {
            assert!(
                matches!(parse_quantity(bad), Err(Error::MalformedRpcResult(_))),
                "{bad:?}"
            );
        }
        assert!(parse_quantity_u64("0x10000000000000000").is_err());
    }

    #[test]
    fn request_shape() {
        let request = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: 1,
            method: "eth_getBalance",
            params: Value::from(vec!["0xabc", LATEST]),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_getBalance",
                "params": ["0xabc", "latest"],
            })
        );
    }

    #[test]
    fn response_with_error_object() {
        let response: JsonRpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "nonce too low"},
        }))
        .unwrap();
        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, -32000);
        assert_eq!(error.message, "nonce too low");
    }

    #[test]
    fn default_config() {
        let config = HttpRpcConfig::default();
        assert_eq!(config.url, "https://mainnet.infura.io");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
