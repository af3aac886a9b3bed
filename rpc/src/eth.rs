//! HTTP JSON-RPC client for Ethereum-style nodes.
//!
//! Only the three calls the contract backend needs: raw transaction
//! submission, transaction lookup by hash, and event logs for a single
//! block. Wraps `reqwest::Client` with the node's base URL and typed
//! methods, one per RPC call.

use std::time::Duration;

use async_trait::async_trait;
use chainscribe_types::TxHandle;

use crate::error::RpcError;

/// A transaction as reported by `eth_getTransactionByHash`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EthTransaction {
    pub hash: String,
    /// `None` while the transaction is still pending.
    pub block_number: Option<u64>,
}

/// One event log entry from `eth_getLogs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EthLog {
    pub transaction_hash: String,
    /// ABI-encoded event payload, `0x`-prefixed.
    pub data: String,
}

/// The minimal Ethereum node surface the contract backend depends on.
#[async_trait]
pub trait EthereumRpc: Send + Sync {
    /// Submit a signed raw transaction; returns the transaction hash.
    async fn send_raw_transaction(&self, blob: &str) -> Result<TxHandle, RpcError>;

    async fn transaction_by_hash(
        &self,
        handle: &TxHandle,
    ) -> Result<Option<EthTransaction>, RpcError>;

    /// Event logs emitted by `contract` within a single block.
    async fn logs(&self, contract: &str, block: u64) -> Result<Vec<EthLog>, RpcError>;
}

/// An [`EthereumRpc`] over HTTP JSON-RPC 2.0.
#[derive(Clone)]
pub struct HttpEthereumRpc {
    http: reqwest::Client,
    node_url: String,
}

impl HttpEthereumRpc {
    pub fn new(node_url: impl Into<String>) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RpcError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: node_url.into(),
        })
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::Http(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RpcError::Http(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RpcError::Protocol(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error") {
            return Err(RpcError::Node {
                code: err
                    .get("code")
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unknown".into()),
                message: err
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("")
                    .to_string(),
            });
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| RpcError::Protocol("response missing result".into()))
    }
}

#[async_trait]
impl EthereumRpc for HttpEthereumRpc {
    async fn send_raw_transaction(&self, blob: &str) -> Result<TxHandle, RpcError> {
        let result = self
            .rpc_call("eth_sendRawTransaction", serde_json::json!([blob]))
            .await?;
        result
            .as_str()
            .map(TxHandle::new)
            .ok_or_else(|| RpcError::Protocol("sendRawTransaction returned no hash".into()))
    }

    async fn transaction_by_hash(
        &self,
        handle: &TxHandle,
    ) -> Result<Option<EthTransaction>, RpcError> {
        let result = self
            .rpc_call(
                "eth_getTransactionByHash",
                serde_json::json!([handle.as_str()]),
            )
            .await?;

        if result.is_null() {
            return Ok(None);
        }

        let hash = result
            .get("hash")
            .and_then(|h| h.as_str())
            .ok_or_else(|| RpcError::Protocol("transaction missing hash".into()))?
            .to_string();
        let block_number = result
            .get("blockNumber")
            .and_then(|b| b.as_str())
            .map(parse_quantity)
            .transpose()?;

        Ok(Some(EthTransaction { hash, block_number }))
    }

    async fn logs(&self, contract: &str, block: u64) -> Result<Vec<EthLog>, RpcError> {
        let block_tag = format!("0x{block:x}");
        let result = self
            .rpc_call(
                "eth_getLogs",
                serde_json::json!([{
                    "address": contract,
                    "fromBlock": block_tag,
                    "toBlock": block_tag,
                }]),
            )
            .await?;

        result
            .as_array()
            .ok_or_else(|| RpcError::Protocol("getLogs returned non-array".into()))?
            .iter()
            .map(|entry| {
                Ok(EthLog {
                    transaction_hash: entry
                        .get("transactionHash")
                        .and_then(|h| h.as_str())
                        .ok_or_else(|| RpcError::Protocol("log missing transactionHash".into()))?
                        .to_string(),
                    data: entry
                        .get("data")
                        .and_then(|d| d.as_str())
                        .unwrap_or("0x")
                        .to_string(),
                })
            })
            .collect()
    }
}

/// Parse a `0x`-prefixed hex quantity.
fn parse_quantity(raw: &str) -> Result<u64, RpcError> {
    u64::from_str_radix(raw.trim_start_matches("0x"), 16)
        .map_err(|e| RpcError::Protocol(format!("bad hex quantity {raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_parses_hex() {
        assert_eq!(parse_quantity("0x10").unwrap(), 16);
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert!(parse_quantity("0xzz").is_err());
    }
}
