//! The primary XRP-style ledger backend.
//!
//! A write is one session: connect, fan out fee state and both balances,
//! enforce the fee ceiling, pick the source account, build and locally sign
//! a one-drop payment carrying the payload as its memo, submit, disconnect.
//! The call returns the handle produced at signing time — it never waits for
//! ledger validation. A read is the mirror image: connect, fetch the
//! validated ledger range, look the handle up within it, disconnect.
//!
//! Connect is mandatory; disconnect is best-effort. Ledger RPC sessions are
//! stateless enough that a leaked handle does not corrupt later operations,
//! so a failed disconnect is logged and the already-obtained result is still
//! returned.

use std::sync::Arc;

use async_trait::async_trait;
use chainscribe_rpc::{LedgerRpc, PrepareInstructions};
use chainscribe_types::{AccountCredential, DropAmount, TxHandle};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::backend::LedgerBackend;
use crate::error::ConnectorError;
use crate::fee::FeePolicy;
use crate::selector::{self, Selection};
use crate::{codec, ConnectorConfig};

/// The ledger's success result code; anything else is a rejection.
pub const SUCCESS_CODE: &str = "tesSUCCESS";

/// How many ledger versions a submitted transaction stays eligible for
/// inclusion before it expires.
pub const LEDGER_OFFSET: u32 = 5;

struct AccountPair {
    source: AccountCredential,
    target: AccountCredential,
}

/// XRP-style backend: anchors payloads in payment memos.
pub struct RippleBackend {
    rpc: Arc<dyn LedgerRpc>,
    accounts: RwLock<AccountPair>,
    fee_policy: FeePolicy,
}

impl RippleBackend {
    pub fn new(
        rpc: Arc<dyn LedgerRpc>,
        source: AccountCredential,
        target: AccountCredential,
        max_fee: DropAmount,
    ) -> Self {
        Self {
            rpc,
            accounts: RwLock::new(AccountPair { source, target }),
            fee_policy: FeePolicy::new(max_fee),
        }
    }

    /// Build a backend from validated configuration.
    pub fn from_config(
        rpc: Arc<dyn LedgerRpc>,
        config: &ConnectorConfig,
    ) -> Result<Self, ConnectorError> {
        let source = config
            .source
            .clone()
            .ok_or_else(|| ConnectorError::Configuration("source account required".into()))?;
        let target = config
            .target
            .clone()
            .ok_or_else(|| ConnectorError::Configuration("target account required".into()))?;
        Ok(Self::new(rpc, source, target, config.max_fee()))
    }

    async fn write_connected(&self, payload: &str) -> Result<TxHandle, ConnectorError> {
        let (source, target) = {
            let pair = self.accounts.read().await;
            (pair.source.clone(), pair.target.clone())
        };

        // Independent reads, no ordering dependency. Fee state is advisory:
        // its failure downgrades to the default fee, balance failures abort.
        let (server_state, source_info, target_info) = tokio::join!(
            self.rpc.server_info(),
            self.rpc.account_info(&source.address),
            self.rpc.account_info(&target.address),
        );
        let server_state = match server_state {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(error = %e, "server info unavailable");
                None
            }
        };
        let source_info = source_info?;
        let target_info = target_info?;

        let fee = self.fee_policy.current_fee(server_state.as_ref());
        self.fee_policy.enforce(fee)?;
        debug!(%fee, "network fee accepted");

        let required = fee + DropAmount::ONE;
        let (source, target) =
            match selector::select(source_info.balance, target_info.balance, required)? {
                Selection::Keep => (source, target),
                Selection::Swap => {
                    debug!(required = %required, "source lacks funds, swapping account roles");
                    let mut pair = self.accounts.write().await;
                    let pair = &mut *pair;
                    std::mem::swap(&mut pair.source, &mut pair.target);
                    (pair.source.clone(), pair.target.clone())
                }
            };

        let request = codec::encode(&source.address, &target.address, DropAmount::ONE, payload);
        let prepared = self
            .rpc
            .prepare(
                &request,
                &PrepareInstructions {
                    fee,
                    ledger_offset: LEDGER_OFFSET,
                },
            )
            .await?;

        // The secret never leaves this step; only the signed blob and the
        // resulting handle proceed.
        let signed = self.rpc.sign(&prepared, source.secret())?;

        let result = self.rpc.submit(&signed.blob).await?;
        if result.code != SUCCESS_CODE {
            return Err(ConnectorError::Submission {
                code: result.code,
                message: result.message,
            });
        }
        debug!(handle = %signed.handle, "transaction submitted");

        Ok(signed.handle)
    }

    async fn read_connected(&self, handle: &TxHandle) -> Result<String, ConnectorError> {
        let range = self.rpc.server_info().await?.validated_range;

        let tx = self
            .rpc
            .transaction(handle, range)
            .await?
            .ok_or_else(|| ConnectorError::NotFound(handle.clone()))?;

        codec::decode(&tx)
    }

    async fn disconnect_best_effort(&self) {
        if let Err(e) = self.rpc.disconnect().await {
            warn!(error = %e, "disconnect failed");
        }
    }
}

#[async_trait]
impl LedgerBackend for RippleBackend {
    async fn write_transaction(&self, payload: &str) -> Result<TxHandle, ConnectorError> {
        {
            let pair = self.accounts.read().await;
            for account in [&pair.source, &pair.target] {
                if !account.is_valid() {
                    return Err(ConnectorError::InvalidAccount(account.address.clone()));
                }
            }
        }

        self.rpc
            .connect()
            .await
            .map_err(|e| ConnectorError::Connection(e.to_string()))?;

        let result = self.write_connected(payload).await;
        self.disconnect_best_effort().await;
        result
    }

    async fn read_transaction(&self, handle: &TxHandle) -> Result<String, ConnectorError> {
        self.rpc
            .connect()
            .await
            .map_err(|e| ConnectorError::Connection(e.to_string()))?;

        let result = self.read_connected(handle).await;
        self.disconnect_best_effort().await;
        result
    }
}
