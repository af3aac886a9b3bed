//! The uniform write/read contract every ledger backend satisfies.

use async_trait::async_trait;
use chainscribe_types::TxHandle;

use crate::error::ConnectorError;

/// Anchor payloads on a ledger and retrieve them by handle.
///
/// Each call is one independent asynchronous flow with its own session;
/// concurrent calls on the same backend are permitted. A write may swap the
/// backend's source/target role assignment, and that swap persists for
/// subsequent calls — callers needing strict ordering must serialize writes
/// externally.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Anchor `payload` in a minimal-value transaction and return its handle.
    ///
    /// Returns as soon as the transaction is submitted — confirmation latency
    /// is left to the caller, who may poll [`read_transaction`] later.
    ///
    /// [`read_transaction`]: LedgerBackend::read_transaction
    async fn write_transaction(&self, payload: &str) -> Result<TxHandle, ConnectorError>;

    /// Retrieve the payload previously anchored under `handle`.
    async fn read_transaction(&self, handle: &TxHandle) -> Result<String, ConnectorError>;
}

impl std::fmt::Debug for dyn LedgerBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn LedgerBackend")
    }
}
