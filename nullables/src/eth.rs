//! Nullable Ethereum RPC — scripted transactions and event logs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chainscribe_rpc::{EthLog, EthTransaction, EthereumRpc, RpcError};
use chainscribe_types::TxHandle;

struct Inner {
    transactions: HashMap<String, EthTransaction>,
    logs: HashMap<u64, Vec<EthLog>>,
    sent: Vec<String>,
    reject: Option<(String, String)>,
    next_hash: u64,
    /// Block newly sent transactions are "mined" into, if any.
    mine_into: Option<u64>,
}

/// A test node that records raw submissions instead of broadcasting them.
pub struct NullEthereumRpc {
    inner: Mutex<Inner>,
}

impl NullEthereumRpc {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                transactions: HashMap::new(),
                logs: HashMap::new(),
                sent: Vec::new(),
                reject: None,
                next_hash: 1,
                mine_into: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("nullable eth node poisoned")
    }

    /// Script a mined or pending transaction.
    pub fn insert_transaction(&self, hash: impl Into<String>, block_number: Option<u64>) {
        let hash = hash.into();
        self.lock().transactions.insert(
            hash.clone(),
            EthTransaction {
                hash,
                block_number,
            },
        );
    }

    /// Script an event log in a block.
    pub fn insert_log(&self, block: u64, transaction_hash: impl Into<String>, data: impl Into<String>) {
        self.lock().logs.entry(block).or_default().push(EthLog {
            transaction_hash: transaction_hash.into(),
            data: data.into(),
        });
    }

    /// Make the node reject subsequent submissions with this error.
    pub fn reject_submissions(&self, code: impl Into<String>, message: impl Into<String>) {
        self.lock().reject = Some((code.into(), message.into()));
    }

    /// Mine subsequent submissions straight into `block`.
    pub fn mine_into(&self, block: u64) {
        self.lock().mine_into = Some(block);
    }

    /// All raw blobs "sent" by callers (for assertions).
    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.clone()
    }
}

impl Default for NullEthereumRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EthereumRpc for NullEthereumRpc {
    async fn send_raw_transaction(&self, blob: &str) -> Result<TxHandle, RpcError> {
        let mut inner = self.lock();
        if let Some((code, message)) = inner.reject.clone() {
            return Err(RpcError::Node { code, message });
        }

        inner.sent.push(blob.to_string());
        let hash = format!("0x{:064x}", inner.next_hash);
        inner.next_hash += 1;

        let block_number = inner.mine_into;
        inner.transactions.insert(
            hash.clone(),
            EthTransaction {
                hash: hash.clone(),
                block_number,
            },
        );
        Ok(TxHandle::new(hash))
    }

    async fn transaction_by_hash(
        &self,
        handle: &TxHandle,
    ) -> Result<Option<EthTransaction>, RpcError> {
        Ok(self.lock().transactions.get(handle.as_str()).cloned())
    }

    async fn logs(&self, _contract: &str, block: u64) -> Result<Vec<EthLog>, RpcError> {
        Ok(self.lock().logs.get(&block).cloned().unwrap_or_default())
    }
}
