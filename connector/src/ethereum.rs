//! Ethereum-contract-style backend.
//!
//! Anchors the payload by calling a storage contract's `write(string)`
//! method in a signed zero-value transaction; the contract re-emits the
//! payload through its `OnWrite(string)` event. Reads resolve the anchoring
//! transaction's block and extract the payload from that block's `OnWrite`
//! logs. The node connection is stateless HTTP, so there is no session
//! lifecycle to manage.

use std::sync::Arc;

use async_trait::async_trait;
use chainscribe_rpc::{EthereumRpc, RpcError};
use chainscribe_types::{AccountCredential, TxHandle};
use tracing::debug;

use crate::backend::LedgerBackend;
use crate::error::ConnectorError;
use crate::ConnectorConfig;

/// Gas ceiling per anchoring transaction unless configured otherwise.
pub const DEFAULT_GAS_LIMIT: u64 = 2_000_000;

/// 4-byte selector of the contract's `write(string)` method.
const WRITE_SELECTOR: &str = "ebaac771";

/// Contract-event backend over an Ethereum-style node.
pub struct EthereumBackend {
    rpc: Arc<dyn EthereumRpc>,
    contract: String,
    /// Signing account. Absent means the backend serves reads only.
    account: Option<AccountCredential>,
    gas_limit: u64,
}

impl EthereumBackend {
    pub fn new(
        rpc: Arc<dyn EthereumRpc>,
        contract: impl Into<String>,
        account: Option<AccountCredential>,
        gas_limit: u64,
    ) -> Self {
        Self {
            rpc,
            contract: contract.into(),
            account,
            gas_limit,
        }
    }

    /// Build a backend from validated configuration.
    pub fn from_config(
        rpc: Arc<dyn EthereumRpc>,
        config: &ConnectorConfig,
    ) -> Result<Self, ConnectorError> {
        let contract = config
            .contract
            .clone()
            .ok_or_else(|| ConnectorError::Configuration("contract address required".into()))?;
        Ok(Self::new(
            rpc,
            contract,
            config.source.clone(),
            config.gas_limit.unwrap_or(DEFAULT_GAS_LIMIT),
        ))
    }
}

#[async_trait]
impl LedgerBackend for EthereumBackend {
    async fn write_transaction(&self, payload: &str) -> Result<TxHandle, ConnectorError> {
        let account = self.account.as_ref().ok_or_else(|| {
            ConnectorError::Configuration(
                "account not provided, this connector serves read-only purposes".into(),
            )
        })?;
        if !account.is_valid() {
            return Err(ConnectorError::InvalidAccount(account.address.clone()));
        }

        let raw_tx = serde_json::json!({
            "from": account.address,
            "to": self.contract,
            "value": "0x0",
            "gas": format!("0x{:x}", self.gas_limit),
            "data": abi_encode_write_call(payload),
        });
        let blob = sign_raw_transaction(&raw_tx, account)?;

        let handle = match self.rpc.send_raw_transaction(&blob).await {
            Ok(handle) => handle,
            // A node-level rejection of the submitted transaction maps to a
            // submission failure; everything else is transport.
            Err(RpcError::Node { code, message }) => {
                return Err(ConnectorError::Submission { code, message })
            }
            Err(e) => return Err(e.into()),
        };
        debug!(handle = %handle, "contract write submitted");

        Ok(handle)
    }

    async fn read_transaction(&self, handle: &TxHandle) -> Result<String, ConnectorError> {
        let tx = self
            .rpc
            .transaction_by_hash(handle)
            .await?
            .ok_or_else(|| ConnectorError::NotFound(handle.clone()))?;

        // A pending transaction has no block yet, so its event log is not
        // part of queryable history.
        let block = tx
            .block_number
            .ok_or_else(|| ConnectorError::NotFound(handle.clone()))?;

        let logs = self.rpc.logs(&self.contract, block).await?;
        logs.iter()
            .find(|log| log.transaction_hash.eq_ignore_ascii_case(handle.as_str()))
            .and_then(|log| abi_decode_string(&log.data))
            .ok_or_else(|| ConnectorError::NoData(handle.clone()))
    }
}

/// ABI-encode a `write(string)` call: selector, argument offset, length,
/// then the string bytes padded to a 32-byte boundary.
pub fn abi_encode_write_call(payload: &str) -> String {
    format!("0x{WRITE_SELECTOR}{}", abi_encode_string(payload))
}

/// ABI encoding of a single dynamic string argument, without selector.
/// This is also the event-log data layout of `OnWrite(string)`.
pub fn abi_encode_string(payload: &str) -> String {
    let bytes = payload.as_bytes();
    let mut out = format!("{:064x}{:064x}", 32, bytes.len());
    out.push_str(&hex::encode(bytes));
    let rem = bytes.len() % 32;
    if rem != 0 {
        out.push_str(&"0".repeat((32 - rem) * 2));
    }
    out
}

/// Decode a single ABI-encoded dynamic string, tolerating a `0x` prefix.
pub fn abi_decode_string(data: &str) -> Option<String> {
    let raw = hex::decode(data.trim_start_matches("0x")).ok()?;
    if raw.len() < 64 {
        return None;
    }
    // Offset and length words come from untrusted log data; all index
    // arithmetic is checked.
    let offset = usize_from_word(&raw[..32])?;
    let len_end = offset.checked_add(32)?;
    let len = usize_from_word(raw.get(offset..len_end)?)?;
    let bytes = raw.get(len_end..len_end.checked_add(len)?)?;
    String::from_utf8(bytes.to_vec()).ok()
}

fn usize_from_word(word: &[u8]) -> Option<usize> {
    if word.len() != 32 || word[..24].iter().any(|&b| b != 0) {
        return None;
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[24..]);
    Some(u64::from_be_bytes(tail) as usize)
}

/// Sign the raw transaction locally. The secret stays inside this call;
/// only the opaque signed blob leaves it.
fn sign_raw_transaction(
    raw_tx: &serde_json::Value,
    account: &AccountCredential,
) -> Result<String, ConnectorError> {
    use ed25519_dalek::{Signer, SigningKey};
    use sha2::{Digest, Sha256};

    let seed: [u8; 32] = Sha256::digest(account.secret().expose().as_bytes()).into();
    let key = SigningKey::from_bytes(&seed);

    let mut bytes = serde_json::to_vec(raw_tx)
        .map_err(|e| ConnectorError::Configuration(format!("unserializable transaction: {e}")))?;
    let signature = key.sign(&bytes);
    bytes.extend_from_slice(&signature.to_bytes());

    Ok(format!("0x{}", hex::encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abi_string_roundtrip() {
        for payload in ["", "x", "hello world", "exactly-thirty-two-bytes-long!!!"] {
            let encoded = abi_encode_string(payload);
            assert_eq!(encoded.len() % 64, 0);
            assert_eq!(abi_decode_string(&encoded).as_deref(), Some(payload));
        }
    }

    #[test]
    fn write_call_carries_selector() {
        let call = abi_encode_write_call("data");
        assert!(call.starts_with("0xebaac771"));
    }

    #[test]
    fn decode_rejects_malformed_data() {
        // Too short to hold offset and length words.
        assert_eq!(abi_decode_string("0x00"), None);
        // Offset word with non-zero high bytes.
        assert_eq!(abi_decode_string(&"ff".repeat(64)), None);
        // Offset pointing past the end of the buffer.
        let encoded = format!("{:064x}{:064x}", 96, 0);
        assert_eq!(abi_decode_string(&encoded), None);
    }

    #[test]
    fn decode_survives_index_overflow_attempts() {
        // Offset at the usize boundary: offset + 32 must not wrap.
        let encoded = format!("{:064x}{:064x}", u64::MAX, 0);
        assert_eq!(abi_decode_string(&encoded), None);
        // Plausible offset, length at the boundary: end index must not wrap.
        let encoded = format!("{:064x}{:064x}", 32, u64::MAX);
        assert_eq!(abi_decode_string(&encoded), None);
    }
}
