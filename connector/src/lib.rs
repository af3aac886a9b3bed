//! Ledger backends for ChainScribe.
//!
//! This crate is the heart of the system. It provides:
//! - The [`LedgerBackend`] write/read contract every backend satisfies
//! - [`RippleBackend`] — the primary XRP-style backend: fee-aware account
//!   selection, transaction construction, local signing, submission and
//!   bounded-range lookup
//! - [`EthereumBackend`] — the contract-event variant of the same contract
//! - [`ConnectorFactory`] — name-to-backend construction from configuration
//! - The typed error taxonomy shared by all of the above

pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod ethereum;
pub mod factory;
pub mod fee;
pub mod ripple;
pub mod selector;

pub use backend::LedgerBackend;
pub use config::ConnectorConfig;
pub use error::ConnectorError;
pub use ethereum::EthereumBackend;
pub use factory::{ConnectorFactory, ConnectorKind};
pub use fee::FeePolicy;
pub use ripple::RippleBackend;
pub use selector::Selection;
