//! WebSocket JSON client for rippled-style ledger servers.
//!
//! Speaks the request/response command protocol: every request carries an
//! `id` and a `command`, every response echoes the `id` with a `status` of
//! `success` or `error`. Signing happens locally — the secret is used to
//! derive an ed25519 key and never crosses the wire.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use futures_util::{SinkExt, StreamExt};
use sha2::{Digest, Sha256};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use chainscribe_types::{
    DropAmount, LedgerRange, Memo, RetrievedTransaction, Secret, ServerState, TransactionRequest,
    TxHandle,
};

use crate::error::RpcError;
use crate::ledger::{
    AccountInfo, LedgerRpc, PrepareInstructions, PreparedTransaction, SignedTransaction,
    SubmitResult,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Drops per whole unit of the ledger's native currency.
const DROPS_PER_UNIT: f64 = 1_000_000.0;

/// A [`LedgerRpc`] implementation over a WebSocket connection.
pub struct WsLedgerRpc {
    server: String,
    stream: Mutex<Option<WsStream>>,
    next_id: AtomicU64,
}

impl WsLedgerRpc {
    /// Create a client targeting the given `wss://` or `ws://` endpoint.
    /// No connection is made until [`LedgerRpc::connect`].
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            stream: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Send one command and wait for the response with the matching id.
    async fn call(
        &self,
        command: &str,
        mut params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = params
            .as_object_mut()
            .ok_or_else(|| RpcError::Protocol("params must be a JSON object".into()))?;
        body.insert("id".into(), serde_json::json!(id));
        body.insert("command".into(), serde_json::json!(command));

        let mut guard = self.stream.lock().await;
        let stream = guard.as_mut().ok_or(RpcError::NotConnected)?;

        stream
            .send(Message::Text(params.to_string()))
            .await
            .map_err(|e| RpcError::Transport(format!("send failed: {e}")))?;

        loop {
            let frame = stream
                .next()
                .await
                .ok_or_else(|| RpcError::Transport("connection closed".into()))?
                .map_err(|e| RpcError::Transport(format!("receive failed: {e}")))?;

            let text = match frame {
                Message::Text(text) => text,
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(_) => {
                    return Err(RpcError::Transport("server closed connection".into()))
                }
                _ => continue,
            };

            let response: serde_json::Value = serde_json::from_str(&text)
                .map_err(|e| RpcError::Protocol(format!("invalid JSON response: {e}")))?;

            // Subscription streams and responses to other in-flight requests
            // share the socket; skip frames that are not ours.
            if response.get("id").and_then(|v| v.as_u64()) != Some(id) {
                continue;
            }

            return match response.get("status").and_then(|s| s.as_str()) {
                Some("success") => Ok(response.get("result").cloned().unwrap_or_default()),
                _ => Err(RpcError::Node {
                    code: response
                        .get("error")
                        .and_then(|e| e.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    message: response
                        .get("error_message")
                        .and_then(|e| e.as_str())
                        .unwrap_or("")
                        .to_string(),
                }),
            };
        }
    }
}

#[async_trait]
impl LedgerRpc for WsLedgerRpc {
    async fn connect(&self) -> Result<(), RpcError> {
        let (stream, _) = connect_async(&self.server)
            .await
            .map_err(|e| RpcError::Connect(format!("{}: {e}", self.server)))?;
        debug!(server = %self.server, "ledger session connected");
        *self.stream.lock().await = Some(stream);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), RpcError> {
        if let Some(mut stream) = self.stream.lock().await.take() {
            stream
                .close(None)
                .await
                .map_err(|e| RpcError::Transport(format!("close failed: {e}")))?;
            debug!(server = %self.server, "ledger session closed");
        }
        Ok(())
    }

    async fn server_info(&self) -> Result<ServerState, RpcError> {
        let result = self.call("server_info", serde_json::json!({})).await?;
        let info = result
            .get("info")
            .ok_or_else(|| RpcError::Protocol("server_info missing info".into()))?;

        let base_fee_units = info
            .get("validated_ledger")
            .and_then(|l| l.get("base_fee_xrp"))
            .and_then(|f| f.as_f64())
            .ok_or_else(|| RpcError::Protocol("server_info missing base fee".into()))?;
        let load_factor = info
            .get("load_factor")
            .and_then(|f| f.as_f64())
            .unwrap_or(1.0);

        let complete = info
            .get("complete_ledgers")
            .and_then(|c| c.as_str())
            .ok_or_else(|| RpcError::Protocol("server_info missing complete_ledgers".into()))?;
        let validated_range = parse_complete_ledgers(complete)?;

        Ok(ServerState {
            base_fee: DropAmount::new((base_fee_units * DROPS_PER_UNIT).round() as u128),
            load_factor,
            validated_range,
        })
    }

    async fn account_info(&self, address: &str) -> Result<AccountInfo, RpcError> {
        let result = self
            .call(
                "account_info",
                serde_json::json!({ "account": address, "ledger_index": "validated" }),
            )
            .await?;
        let data = result
            .get("account_data")
            .ok_or_else(|| RpcError::Protocol("account_info missing account_data".into()))?;

        let balance = data
            .get("Balance")
            .and_then(|b| b.as_str())
            .and_then(|b| b.parse::<u128>().ok())
            .ok_or_else(|| RpcError::Protocol("account_info missing Balance".into()))?;
        let sequence = data
            .get("Sequence")
            .and_then(|s| s.as_u64())
            .ok_or_else(|| RpcError::Protocol("account_info missing Sequence".into()))?;

        Ok(AccountInfo {
            balance: DropAmount::new(balance),
            sequence: sequence as u32,
        })
    }

    async fn prepare(
        &self,
        request: &TransactionRequest,
        instructions: &PrepareInstructions,
    ) -> Result<PreparedTransaction, RpcError> {
        let current = self
            .call("ledger_current", serde_json::json!({}))
            .await?
            .get("ledger_current_index")
            .and_then(|i| i.as_u64())
            .ok_or_else(|| RpcError::Protocol("ledger_current missing index".into()))?;
        let sequence = self.account_info(&request.source).await?.sequence;

        let tx_json = serde_json::json!({
            "TransactionType": "Payment",
            "Account": request.source,
            "Destination": request.target,
            "Amount": request.amount.raw().to_string(),
            "Fee": instructions.fee.raw().to_string(),
            "Sequence": sequence,
            "LastLedgerSequence": current as u32 + instructions.ledger_offset,
            "Memos": [{ "Memo": { "MemoData": hex::encode_upper(&request.payload) } }],
        });

        Ok(PreparedTransaction { tx_json })
    }

    fn sign(
        &self,
        prepared: &PreparedTransaction,
        secret: &Secret,
    ) -> Result<SignedTransaction, RpcError> {
        let seed: [u8; 32] = Sha256::digest(secret.expose().as_bytes()).into();
        let key = SigningKey::from_bytes(&seed);

        let canonical = serde_json::to_vec(&prepared.tx_json)
            .map_err(|e| RpcError::Signing(format!("serialization failed: {e}")))?;
        let signature = key.sign(&canonical);

        let mut signed = prepared.tx_json.clone();
        let body = signed
            .as_object_mut()
            .ok_or_else(|| RpcError::Signing("prepared tx_json must be an object".into()))?;
        body.insert(
            "SigningPubKey".into(),
            serde_json::json!(hex::encode_upper(key.verifying_key().to_bytes())),
        );
        body.insert(
            "TxnSignature".into(),
            serde_json::json!(hex::encode_upper(signature.to_bytes())),
        );

        let blob = hex::encode_upper(
            serde_json::to_vec(&signed)
                .map_err(|e| RpcError::Signing(format!("serialization failed: {e}")))?,
        );
        let handle = TxHandle::new(hex::encode_upper(Sha256::digest(blob.as_bytes())));

        Ok(SignedTransaction { blob, handle })
    }

    async fn submit(&self, blob: &str) -> Result<SubmitResult, RpcError> {
        let result = self
            .call("submit", serde_json::json!({ "tx_blob": blob }))
            .await?;

        Ok(SubmitResult {
            code: result
                .get("engine_result")
                .and_then(|c| c.as_str())
                .unwrap_or("unknown")
                .to_string(),
            message: result
                .get("engine_result_message")
                .and_then(|m| m.as_str())
                .unwrap_or("")
                .to_string(),
        })
    }

    async fn transaction(
        &self,
        handle: &TxHandle,
        range: LedgerRange,
    ) -> Result<Option<RetrievedTransaction>, RpcError> {
        let result = self
            .call(
                "tx",
                serde_json::json!({
                    "transaction": handle.as_str(),
                    "min_ledger": range.min,
                    "max_ledger": range.max,
                }),
            )
            .await;

        let result = match result {
            Ok(value) => value,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let memos = match result.get("Memos").and_then(|m| m.as_array()) {
            Some(entries) => entries
                .iter()
                .map(|entry| {
                    let data = entry
                        .get("Memo")
                        .and_then(|m| m.get("MemoData"))
                        .and_then(|d| d.as_str())
                        .map(decode_memo_data)
                        .transpose()?;
                    Ok(Memo { data })
                })
                .collect::<Result<Vec<_>, RpcError>>()?,
            None => Vec::new(),
        };

        Ok(Some(RetrievedTransaction {
            handle: handle.clone(),
            memos,
        }))
    }
}

/// Parse the server's `complete_ledgers` string ("32570-62139", possibly a
/// comma-separated list of ranges) into the most recent contiguous range.
fn parse_complete_ledgers(complete: &str) -> Result<LedgerRange, RpcError> {
    let last = complete
        .rsplit(',')
        .next()
        .ok_or_else(|| RpcError::Protocol("empty complete_ledgers".into()))?;
    let (min, max) = last
        .split_once('-')
        .ok_or_else(|| RpcError::Protocol(format!("unparsable complete_ledgers: {complete}")))?;
    let min = min
        .trim()
        .parse::<u32>()
        .map_err(|e| RpcError::Protocol(format!("bad ledger range start: {e}")))?;
    let max = max
        .trim()
        .parse::<u32>()
        .map_err(|e| RpcError::Protocol(format!("bad ledger range end: {e}")))?;
    Ok(LedgerRange::new(min, max))
}

/// Memo data travels hex-encoded; decode back to the original string.
fn decode_memo_data(encoded: &str) -> Result<String, RpcError> {
    let bytes = hex::decode(encoded)
        .map_err(|e| RpcError::Protocol(format!("memo data is not hex: {e}")))?;
    String::from_utf8(bytes).map_err(|e| RpcError::Protocol(format!("memo data is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_ledgers_single_range() {
        let range = parse_complete_ledgers("32570-62139").unwrap();
        assert_eq!(range, LedgerRange::new(32570, 62139));
    }

    #[test]
    fn complete_ledgers_takes_most_recent_range() {
        let range = parse_complete_ledgers("100-200,300-400").unwrap();
        assert_eq!(range, LedgerRange::new(300, 400));
    }

    #[test]
    fn complete_ledgers_rejects_garbage() {
        assert!(parse_complete_ledgers("empty").is_err());
    }

    #[test]
    fn memo_data_roundtrip() {
        let encoded = hex::encode_upper("payload");
        assert_eq!(decode_memo_data(&encoded).unwrap(), "payload");
    }

    #[test]
    fn sign_produces_64_char_handle() {
        let rpc = WsLedgerRpc::new("wss://example.test");
        let prepared = PreparedTransaction {
            tx_json: serde_json::json!({
                "TransactionType": "Payment",
                "Account": "SRC1",
                "Destination": "TGT1",
                "Amount": "1",
            }),
        };
        let signed = rpc.sign(&prepared, &Secret::new("SEC1")).unwrap();
        assert_eq!(signed.handle.as_str().len(), 64);
        assert!(signed
            .handle
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn sign_is_deterministic_per_secret() {
        let rpc = WsLedgerRpc::new("wss://example.test");
        let prepared = PreparedTransaction {
            tx_json: serde_json::json!({ "Account": "SRC1", "Amount": "1" }),
        };
        let a = rpc.sign(&prepared, &Secret::new("SEC1")).unwrap();
        let b = rpc.sign(&prepared, &Secret::new("SEC1")).unwrap();
        let c = rpc.sign(&prepared, &Secret::new("SEC2")).unwrap();
        assert_eq!(a.handle, b.handle);
        assert_ne!(a.handle, c.handle);
    }
}
