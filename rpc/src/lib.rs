//! Ledger RPC clients for ChainScribe.
//!
//! The connector core is written against the capability traits defined here:
//! - [`LedgerRpc`] — session-scoped XRP-style ledger access (connect,
//!   server/account info, prepare, local signing, submit, bounded lookup)
//! - [`EthereumRpc`] — the minimal Ethereum node surface the contract
//!   backend needs (raw submission, transaction lookup, event logs)
//!
//! Real implementations live alongside the traits: [`WsLedgerRpc`] speaks
//! JSON over WebSocket to a rippled-style server, [`HttpEthereumRpc`] speaks
//! JSON-RPC 2.0 over HTTP. Deterministic test doubles are in the
//! `chainscribe-nullables` crate.

pub mod error;
pub mod eth;
pub mod ledger;
pub mod ws;

pub use error::RpcError;
pub use eth::{EthLog, EthTransaction, EthereumRpc, HttpEthereumRpc};
pub use ledger::{
    AccountInfo, LedgerRpc, PrepareInstructions, PreparedTransaction, SignedTransaction,
    SubmitResult,
};
pub use ws::WsLedgerRpc;
