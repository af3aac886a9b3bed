//! Opaque transaction handles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifier a write returns and a read resolves.
///
/// Opaque to everything but the backend that produced it. XRP-style handles
/// are 64 uppercase hex characters; Ethereum-style handles are `0x`-prefixed.
/// Uniqueness per submitted transaction is the only guarantee — a handle
/// exists independently of ledger confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHandle(String);

impl TxHandle {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}
