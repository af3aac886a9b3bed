//! Nullable ledger RPC infrastructure for deterministic testing.
//!
//! The connector core depends on the RPC capability traits; this crate
//! provides implementations that:
//! - Return deterministic, scripted values
//! - Can be controlled programmatically (balances, failures, result codes)
//! - Record every submission for assertions
//! - Never touch the network
//!
//! Usage: swap real RPC clients for nullables in tests.

pub mod eth;
pub mod ledger;

pub use eth::NullEthereumRpc;
pub use ledger::NullLedgerRpc;
