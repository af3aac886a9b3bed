//! Fundamental types for ChainScribe.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: account credentials, amounts, transaction handles, server state
//! and transaction shapes.

pub mod account;
pub mod amount;
pub mod handle;
pub mod ledger;
pub mod transaction;

pub use account::{AccountCredential, Secret};
pub use amount::DropAmount;
pub use handle::TxHandle;
pub use ledger::{LedgerRange, ServerState};
pub use transaction::{Memo, RetrievedTransaction, TransactionRequest};
