//! Source account selection based on live balances.

use chainscribe_types::DropAmount;

use crate::error::ConnectorError;

/// The selector's verdict on the configured source/target roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// The configured source covers the cost; roles stay as configured.
    Keep,
    /// Only the target covers the cost; roles swap for this and subsequent
    /// calls.
    Swap,
}

/// Choose which account sources the transaction.
///
/// Deterministic tie-break: equality counts as sufficient, and the rule only
/// swaps when the original source is insufficient — a richer target never
/// displaces a sufficient source.
pub fn select(
    source: DropAmount,
    target: DropAmount,
    required: DropAmount,
) -> Result<Selection, ConnectorError> {
    if source >= required {
        Ok(Selection::Keep)
    } else if target >= required {
        Ok(Selection::Swap)
    } else {
        Err(ConnectorError::InsufficientFunds {
            required,
            source,
            target,
        })
    }
}
