//! Connector error taxonomy.
//!
//! Validation errors are raised before any network access; errors in
//! mandatory steps abort the call; best-effort steps (fee estimation,
//! disconnect) are downgraded to warnings by the backends and never appear
//! here. Every error is terminal for its call — backends do not retry.

use std::fmt;

use chainscribe_types::{DropAmount, TxHandle};

// Display/Error are implemented by hand rather than via thiserror: the
// `InsufficientFunds::source` field is a balance, not a cause, but thiserror
// unconditionally treats a field named `source` as the error source.
#[derive(Debug)]
pub enum ConnectorError {
    /// Malformed configuration (server URI, contract address, accounts)
    /// detected before any I/O.
    Configuration(String),

    /// The requested connector name is not in the known set.
    UnknownConnector(String),

    /// A configured account failed the syntactic well-formedness check.
    InvalidAccount(String),

    /// Transport failure during a mandatory step (connect or any RPC call).
    Connection(String),

    /// The live network fee exceeds the configured ceiling.
    FeeExceeded { fee: DropAmount, max: DropAmount },

    /// Neither configured account can cover fee plus transfer amount.
    InsufficientFunds {
        required: DropAmount,
        source: DropAmount,
        target: DropAmount,
    },

    /// The ledger rejected the submitted transaction.
    Submission { code: String, message: String },

    /// No transaction with this handle exists in the queried ledger range.
    NotFound(TxHandle),

    /// The transaction exists but carries no usable memo.
    NoData(TxHandle),
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::UnknownConnector(name) => write!(f, "unknown connector: {name}"),
            Self::InvalidAccount(msg) => write!(f, "invalid account: {msg}"),
            Self::Connection(msg) => write!(f, "connection error: {msg}"),
            Self::FeeExceeded { fee, max } => {
                write!(f, "maximum allowed fee exceeded: requires {fee}, ceiling {max}")
            }
            Self::InsufficientFunds {
                required,
                source,
                target,
            } => write!(
                f,
                "account balance is not sufficient: requires {required}, source has {source}, target has {target}"
            ),
            Self::Submission { code, message } => {
                write!(f, "submission rejected ({code}): {message}")
            }
            Self::NotFound(handle) => write!(f, "transaction not found: {handle}"),
            Self::NoData(handle) => write!(f, "transaction has no data: {handle}"),
        }
    }
}

impl std::error::Error for ConnectorError {}

impl From<chainscribe_rpc::RpcError> for ConnectorError {
    fn from(e: chainscribe_rpc::RpcError) -> Self {
        Self::Connection(e.to_string())
    }
}
