//! The ledger RPC capability the connector core is written against.

use async_trait::async_trait;
use chainscribe_types::{
    DropAmount, LedgerRange, RetrievedTransaction, Secret, ServerState, TransactionRequest,
    TxHandle,
};
use serde::{Deserialize, Serialize};

use crate::error::RpcError;

/// Live account state needed to source a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub balance: DropAmount,
    /// Next transaction sequence number for the account.
    pub sequence: u32,
}

/// Caller-supplied constraints applied when preparing a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrepareInstructions {
    /// The fee the transaction will pay, computed by the fee policy.
    pub fee: DropAmount,
    /// How many ledger versions past the current one the transaction
    /// remains eligible for inclusion before it expires.
    pub ledger_offset: u32,
}

/// A server-shaped transaction ready for local signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedTransaction {
    pub tx_json: serde_json::Value,
}

/// The output of local signing: an opaque blob plus the handle that
/// identifies the transaction once submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub blob: String,
    pub handle: TxHandle,
}

/// The ledger's verdict on a submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub code: String,
    pub message: String,
}

/// Session-scoped access to an XRP-style ledger server.
///
/// One session spans a single write or read call: mandatory `connect`,
/// operation-specific calls, best-effort `disconnect`. Implementations must
/// tolerate `disconnect` without a prior `connect`.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    async fn connect(&self) -> Result<(), RpcError>;

    async fn disconnect(&self) -> Result<(), RpcError>;

    /// Fetch fee state and the validated ledger range. Fresh per call.
    async fn server_info(&self) -> Result<ServerState, RpcError>;

    async fn account_info(&self, address: &str) -> Result<AccountInfo, RpcError>;

    /// Shape a transaction request into the server's representation.
    async fn prepare(
        &self,
        request: &TransactionRequest,
        instructions: &PrepareInstructions,
    ) -> Result<PreparedTransaction, RpcError>;

    /// Sign a prepared transaction locally. The secret never leaves this
    /// call; only the signed blob and the resulting handle proceed.
    fn sign(
        &self,
        prepared: &PreparedTransaction,
        secret: &Secret,
    ) -> Result<SignedTransaction, RpcError>;

    async fn submit(&self, blob: &str) -> Result<SubmitResult, RpcError>;

    /// Look up a transaction by handle within the validated range.
    /// `Ok(None)` means the handle is absent from the queried window.
    async fn transaction(
        &self,
        handle: &TxHandle,
        range: LedgerRange,
    ) -> Result<Option<RetrievedTransaction>, RpcError>;
}
