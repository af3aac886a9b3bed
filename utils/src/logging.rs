//! Tracing setup for the `chainscribe` binary and tests.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset: connector activity at `info`,
/// everything else at `warn` so transport-layer noise stays out of the way
/// of write/read output.
pub const DEFAULT_DIRECTIVE: &str =
    "warn,chainscribe=info,chainscribe_connector=info,chainscribe_rpc=info";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; without it the [`DEFAULT_DIRECTIVE`] filter
/// applies.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directive_is_a_valid_filter() {
        assert!(DEFAULT_DIRECTIVE.parse::<EnvFilter>().is_ok());
    }
}
