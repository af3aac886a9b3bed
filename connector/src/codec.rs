//! Transaction codec: payload in, payload out.
//!
//! The encoded shape is structurally fixed — source and destination address,
//! the minimal transfer amount, and a single memo carrying the payload as
//! opaque text. No encoding transformation is applied; the payload is stored
//! byte-for-byte.

use chainscribe_types::{DropAmount, RetrievedTransaction, TransactionRequest};

use crate::error::ConnectorError;

/// Build the transaction request for an anchoring write.
pub fn encode(
    source: &str,
    target: &str,
    amount: DropAmount,
    payload: &str,
) -> TransactionRequest {
    TransactionRequest {
        source: source.to_string(),
        target: target.to_string(),
        amount,
        payload: payload.to_string(),
    }
}

/// Extract the anchored payload from a retrieved transaction.
///
/// Returns the first memo's data, or [`ConnectorError::NoData`] when the
/// memo list is empty or the first memo lacks a data field.
pub fn decode(tx: &RetrievedTransaction) -> Result<String, ConnectorError> {
    tx.memos
        .first()
        .and_then(|memo| memo.data.clone())
        .ok_or_else(|| ConnectorError::NoData(tx.handle.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainscribe_types::{Memo, TxHandle};

    fn retrieved(memos: Vec<Memo>) -> RetrievedTransaction {
        RetrievedTransaction {
            handle: TxHandle::new("A".repeat(64)),
            memos,
        }
    }

    #[test]
    fn encode_is_structurally_fixed() {
        let request = encode("SRC1", "TGT1", DropAmount::ONE, "payload");
        assert_eq!(request.source, "SRC1");
        assert_eq!(request.target, "TGT1");
        assert_eq!(request.amount, DropAmount::ONE);
        assert_eq!(request.payload, "payload");
    }

    #[test]
    fn decode_returns_first_memo() {
        let tx = retrieved(vec![Memo::with_data("first"), Memo::with_data("second")]);
        assert_eq!(decode(&tx).unwrap(), "first");
    }

    #[test]
    fn decode_empty_memos_is_no_data() {
        assert!(matches!(
            decode(&retrieved(vec![])),
            Err(ConnectorError::NoData(_))
        ));
    }

    #[test]
    fn decode_dataless_first_memo_is_no_data() {
        let tx = retrieved(vec![Memo { data: None }, Memo::with_data("second")]);
        assert!(matches!(decode(&tx), Err(ConnectorError::NoData(_))));
    }
}
