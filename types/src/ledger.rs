//! Server-reported ledger state.

use crate::amount::DropAmount;
use serde::{Deserialize, Serialize};

/// The inclusive span of ledger versions the server has fully validated.
///
/// Transaction lookups are bounded to this range — the protocol requires a
/// search window, and the bound caps worst-case query cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRange {
    pub min: u32,
    pub max: u32,
}

impl LedgerRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, version: u32) -> bool {
        self.min <= version && version <= self.max
    }
}

/// A snapshot of the remote server's fee and ledger state.
///
/// Fetched fresh per operation, never cached across calls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerState {
    /// Base transaction fee before load scaling.
    pub base_fee: DropAmount,
    /// Server load multiplier applied to the base fee.
    pub load_factor: f64,
    /// Validated ledger range currently searchable on this server.
    pub validated_range: LedgerRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_contains_is_inclusive() {
        let range = LedgerRange::new(10, 20);
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }
}
