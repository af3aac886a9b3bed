//! Transaction shapes: the request a write builds and the record a read
//! retrieves.

use crate::amount::DropAmount;
use crate::handle::TxHandle;
use serde::{Deserialize, Serialize};

/// A single memo entry attached to a ledger transaction.
///
/// The data field is optional on the wire: a transaction can exist with a
/// memo entry that carries no data, which is distinct from having no memos
/// at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub data: Option<String>,
}

impl Memo {
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }
}

/// The value-transfer-plus-memo a write submits.
///
/// Built once per write by the transaction codec, immutable after
/// construction. The transfer amount is fixed at one drop — this is a
/// data-anchoring write, not a funds transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub source: String,
    pub target: String,
    pub amount: DropAmount,
    pub payload: String,
}

/// A transaction retrieved from the ledger by handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedTransaction {
    pub handle: TxHandle,
    pub memos: Vec<Memo>,
}
