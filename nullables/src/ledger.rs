//! Nullable ledger RPC — a scripted, in-memory ledger server.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chainscribe_rpc::{
    AccountInfo, LedgerRpc, PrepareInstructions, PreparedTransaction, RpcError, SignedTransaction,
    SubmitResult,
};
use chainscribe_types::{
    DropAmount, LedgerRange, Memo, RetrievedTransaction, Secret, ServerState, TransactionRequest,
    TxHandle,
};

/// The result code a submission reports unless scripted otherwise.
const SUCCESS_CODE: &str = "tesSUCCESS";

struct Inner {
    server_state: Option<ServerState>,
    balances: HashMap<String, DropAmount>,
    fail_connect: bool,
    fail_disconnect: bool,
    submit_result: SubmitResult,
    connects: u32,
    disconnects: u32,
    /// Signed-but-not-submitted transactions, keyed by blob.
    pending: HashMap<String, (TxHandle, Vec<Memo>)>,
    /// The "validated" ledger: handle → (ledger version, transaction).
    ledger: HashMap<String, (u32, RetrievedTransaction)>,
    prepared: Vec<TransactionRequest>,
    submitted: Vec<TxHandle>,
    next_handle: u64,
    current_ledger: u32,
}

/// A test ledger that records submissions instead of broadcasting them.
///
/// Successful submissions are validated immediately into the in-memory
/// ledger, so a write followed by a read observes the eventual-consistency
/// guarantee without waiting.
pub struct NullLedgerRpc {
    inner: Mutex<Inner>,
}

impl NullLedgerRpc {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                server_state: Some(ServerState {
                    base_fee: DropAmount::new(10),
                    load_factor: 1.0,
                    validated_range: LedgerRange::new(1, 100),
                }),
                balances: HashMap::new(),
                fail_connect: false,
                fail_disconnect: false,
                submit_result: SubmitResult {
                    code: SUCCESS_CODE.into(),
                    message: "The transaction was applied.".into(),
                },
                connects: 0,
                disconnects: 0,
                pending: HashMap::new(),
                ledger: HashMap::new(),
                prepared: Vec::new(),
                submitted: Vec::new(),
                next_handle: 1,
                current_ledger: 100,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("nullable ledger poisoned")
    }

    /// Script an account balance.
    pub fn set_balance(&self, address: impl Into<String>, balance: DropAmount) {
        self.lock().balances.insert(address.into(), balance);
    }

    /// Script the server state; `None` makes `server_info` fail.
    pub fn set_server_state(&self, state: Option<ServerState>) {
        self.lock().server_state = state;
    }

    /// Make the next `connect` calls fail.
    pub fn fail_connect(&self) {
        self.lock().fail_connect = true;
    }

    /// Make `disconnect` calls fail.
    pub fn fail_disconnect(&self) {
        self.lock().fail_disconnect = true;
    }

    /// Script the result every submission reports.
    pub fn set_submit_result(&self, code: impl Into<String>, message: impl Into<String>) {
        self.lock().submit_result = SubmitResult {
            code: code.into(),
            message: message.into(),
        };
    }

    /// Place a transaction directly into the validated ledger.
    pub fn insert_transaction(&self, handle: TxHandle, version: u32, memos: Vec<Memo>) {
        self.lock().ledger.insert(
            handle.as_str().to_string(),
            (version, RetrievedTransaction { handle, memos }),
        );
    }

    /// Every transaction request prepared so far (for assertions on which
    /// account ended up as source).
    pub fn prepared(&self) -> Vec<TransactionRequest> {
        self.lock().prepared.clone()
    }

    /// Handles of all submitted transactions (for assertions).
    pub fn submitted(&self) -> Vec<TxHandle> {
        self.lock().submitted.clone()
    }

    pub fn connects(&self) -> u32 {
        self.lock().connects
    }

    pub fn disconnects(&self) -> u32 {
        self.lock().disconnects
    }
}

impl Default for NullLedgerRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRpc for NullLedgerRpc {
    async fn connect(&self) -> Result<(), RpcError> {
        let mut inner = self.lock();
        if inner.fail_connect {
            return Err(RpcError::Connect("nullable connect refused".into()));
        }
        inner.connects += 1;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), RpcError> {
        let mut inner = self.lock();
        if inner.fail_disconnect {
            return Err(RpcError::Transport("nullable disconnect refused".into()));
        }
        inner.disconnects += 1;
        Ok(())
    }

    async fn server_info(&self) -> Result<ServerState, RpcError> {
        self.lock()
            .server_state
            .clone()
            .ok_or_else(|| RpcError::Transport("server_info unavailable".into()))
    }

    async fn account_info(&self, address: &str) -> Result<AccountInfo, RpcError> {
        let balance = self.lock().balances.get(address).copied().ok_or_else(|| {
            RpcError::Node {
                code: "actNotFound".into(),
                message: format!("account not found: {address}"),
            }
        })?;
        Ok(AccountInfo {
            balance,
            sequence: 1,
        })
    }

    async fn prepare(
        &self,
        request: &TransactionRequest,
        instructions: &PrepareInstructions,
    ) -> Result<PreparedTransaction, RpcError> {
        let current = {
            let mut inner = self.lock();
            inner.prepared.push(request.clone());
            inner.current_ledger
        };
        Ok(PreparedTransaction {
            tx_json: serde_json::json!({
                "TransactionType": "Payment",
                "Account": request.source,
                "Destination": request.target,
                "Amount": request.amount.raw().to_string(),
                "Fee": instructions.fee.raw().to_string(),
                "LastLedgerSequence": current + instructions.ledger_offset,
                "Memos": [{ "Memo": { "MemoData": request.payload } }],
            }),
        })
    }

    fn sign(
        &self,
        prepared: &PreparedTransaction,
        _secret: &Secret,
    ) -> Result<SignedTransaction, RpcError> {
        let mut inner = self.lock();
        let handle = TxHandle::new(format!("{:064X}", inner.next_handle));
        inner.next_handle += 1;

        let memos = prepared
            .tx_json
            .get("Memos")
            .and_then(|m| m.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| Memo {
                        data: entry
                            .get("Memo")
                            .and_then(|m| m.get("MemoData"))
                            .and_then(|d| d.as_str())
                            .map(String::from),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let blob = format!("{}:{}", handle, prepared.tx_json);
        inner.pending.insert(blob.clone(), (handle.clone(), memos));

        Ok(SignedTransaction { blob, handle })
    }

    async fn submit(&self, blob: &str) -> Result<SubmitResult, RpcError> {
        let mut inner = self.lock();
        let (handle, memos) = inner
            .pending
            .remove(blob)
            .ok_or_else(|| RpcError::Protocol("submitted blob was never signed".into()))?;

        inner.submitted.push(handle.clone());

        let result = inner.submit_result.clone();
        if result.code == SUCCESS_CODE {
            let version = inner.current_ledger;
            inner.ledger.insert(
                handle.as_str().to_string(),
                (version, RetrievedTransaction { handle, memos }),
            );
        }
        Ok(result)
    }

    async fn transaction(
        &self,
        handle: &TxHandle,
        range: LedgerRange,
    ) -> Result<Option<RetrievedTransaction>, RpcError> {
        Ok(self
            .lock()
            .ledger
            .get(handle.as_str())
            .filter(|(version, _)| range.contains(*version))
            .map(|(_, tx)| tx.clone()))
    }
}
