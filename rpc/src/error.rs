//! RPC transport error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("not connected")]
    NotConnected,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("node error {code}: {message}")]
    Node { code: String, message: String },

    #[error("http error: {0}")]
    Http(String),

    #[error("signing error: {0}")]
    Signing(String),
}

impl RpcError {
    /// Whether this is the server's "transaction not found" rejection.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Node { code, .. } if code == "txnNotFound")
    }
}
