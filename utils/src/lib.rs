//! Shared utilities for ChainScribe.

pub mod logging;

pub use logging::{init_tracing, DEFAULT_DIRECTIVE};
