//! evm-client: JSON-RPC chain client for EVM networks
//!
//! Exposes the `ChainClient` boundary the quoting engine works against:
//! read-only `eth_call`, block number, and gas price. The production
//! implementation speaks JSON-RPC over HTTP with an explicit per-call
//! timeout; tests inject fakes through the same trait.

pub mod abi;
pub mod gate;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ethereum_types::{Address, U256};
use routescout_core::{ChainId, RpcError};
use serde_json::json;

pub use gate::CallGate;

/// Result type for chain client operations
pub type Result<T> = std::result::Result<T, RpcError>;

/// Read-only chain access used by the venue adapters.
///
/// Implementations must not retry internally: the adapter layer owns the
/// retry/backoff policy and the downgrade of failures to no-liquidity.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Execute a read-only contract call (`eth_call`) and return the raw
    /// return data.
    async fn call(&self, chain: ChainId, to: Address, data: Vec<u8>) -> Result<Vec<u8>>;

    /// Current block number
    async fn get_block_number(&self, chain: ChainId) -> Result<u64>;

    /// Current gas price in wei
    async fn get_gas_price(&self, chain: ChainId) -> Result<U256>;
}

/// JSON-RPC chain client over HTTP
pub struct RpcClient {
    http: reqwest::Client,
    endpoints: HashMap<ChainId, String>,
    call_timeout: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(endpoints: HashMap<ChainId, String>, call_timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints,
            call_timeout,
            next_id: AtomicU64::new(1),
        }
    }

    fn endpoint(&self, chain: ChainId) -> Result<&str> {
        self.endpoints
            .get(&chain)
            .map(|s| s.as_str())
            .ok_or_else(|| RpcError::NoEndpoint {
                chain: chain.to_string(),
            })
    }

    /// Send one JSON-RPC request and return the `result` field.
    async fn request(&self, chain: ChainId, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let url = self.endpoint(chain)?;
        tracing::debug!(chain = %chain, method, "rpc request");
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        let response = timed_request(self.call_timeout, async {
            self.http
                .post(url)
                .json(&body)
                .send()
                .await
                .map_err(|e| RpcError::Unreachable {
                    url: format!("{}: {}", url, e),
                })
        })
        .await?;

        let envelope: serde_json::Value = timed_request(self.call_timeout, async {
            response
                .json()
                .await
                .map_err(|e| RpcError::Parse(e.to_string()))
        })
        .await?;

        if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
            let message = error["message"].as_str().unwrap_or("unknown error").to_string();
            // Reverts come back as JSON-RPC errors on most providers
            if message.to_ascii_lowercase().contains("revert") {
                return Err(RpcError::Reverted { message });
            }
            return Err(RpcError::Api { message });
        }

        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| RpcError::Parse("missing result field".to_string()))
    }
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn call(&self, chain: ChainId, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let params = json!([
            {
                "to": format!("{:#x}", to),
                "data": format!("0x{}", hex::encode(&data)),
            },
            "latest",
        ]);
        let result = self.request(chain, "eth_call", params).await?;
        let hex_str = result
            .as_str()
            .ok_or_else(|| RpcError::Parse("eth_call result is not a string".to_string()))?;
        decode_hex(hex_str)
    }

    async fn get_block_number(&self, chain: ChainId) -> Result<u64> {
        let result = self.request(chain, "eth_blockNumber", json!([])).await?;
        parse_quantity(&result).map(|v| v.as_u64())
    }

    async fn get_gas_price(&self, chain: ChainId) -> Result<U256> {
        let result = self.request(chain, "eth_gasPrice", json!([])).await?;
        parse_quantity(&result)
    }
}

/// Wrap a chain call with a timeout, converting elapsed time to `RpcError`.
async fn timed_request<T>(
    limit: Duration,
    fut: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| RpcError::Timeout {
            seconds: limit.as_secs(),
        })?
}

/// Decode a 0x-prefixed hex string into bytes
fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(trimmed).map_err(|e| RpcError::Parse(format!("invalid hex: {}", e)))
}

/// Parse a JSON-RPC quantity ("0x..." hex string) into U256
fn parse_quantity(value: &serde_json::Value) -> Result<U256> {
    let s = value
        .as_str()
        .ok_or_else(|| RpcError::Parse("quantity is not a string".to_string()))?;
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    U256::from_str_radix(trimmed, 16).map_err(|e| RpcError::Parse(format!("invalid quantity: {}", e)))
}
