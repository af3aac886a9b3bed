//! Network fee computation and ceiling enforcement.

use chainscribe_types::{DropAmount, ServerState};
use tracing::warn;

use crate::error::ConnectorError;

/// Fee charged when the server's fee state is unavailable.
///
/// Fee estimation is advisory: the estimation endpoint is allowed to be
/// transiently unavailable without failing the whole write.
pub const DEFAULT_FEE: DropAmount = DropAmount::new(50);

/// Default fee ceiling in drops.
pub const DEFAULT_MAX_FEE: DropAmount = DropAmount::new(1000);

/// The current network fee: base fee scaled by server load.
pub fn compute_fee(state: &ServerState) -> DropAmount {
    state.base_fee.scaled_by(state.load_factor)
}

/// Computes per-call fees and enforces the configured ceiling.
#[derive(Clone, Copy, Debug)]
pub struct FeePolicy {
    max_fee: DropAmount,
}

impl FeePolicy {
    pub fn new(max_fee: DropAmount) -> Self {
        Self { max_fee }
    }

    /// The fee for this call: computed from server state when available,
    /// otherwise the fixed default.
    pub fn current_fee(&self, state: Option<&ServerState>) -> DropAmount {
        match state {
            Some(state) => compute_fee(state),
            None => {
                warn!(fallback = %DEFAULT_FEE, "fee estimation unavailable, using default fee");
                DEFAULT_FEE
            }
        }
    }

    /// Fail the call when the live fee exceeds the configured ceiling.
    pub fn enforce(&self, fee: DropAmount) -> Result<(), ConnectorError> {
        if fee > self.max_fee {
            return Err(ConnectorError::FeeExceeded {
                fee,
                max: self.max_fee,
            });
        }
        Ok(())
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainscribe_types::LedgerRange;

    fn state(base: u128, load: f64) -> ServerState {
        ServerState {
            base_fee: DropAmount::new(base),
            load_factor: load,
            validated_range: LedgerRange::new(1, 100),
        }
    }

    #[test]
    fn fee_is_base_times_load() {
        assert_eq!(compute_fee(&state(10, 1.0)), DropAmount::new(10));
        assert_eq!(compute_fee(&state(10, 256.0)), DropAmount::new(2560));
    }

    #[test]
    fn fractional_fees_round_up() {
        assert_eq!(compute_fee(&state(10, 1.05)), DropAmount::new(11));
    }

    #[test]
    fn missing_state_falls_back_to_default() {
        let policy = FeePolicy::default();
        assert_eq!(policy.current_fee(None), DEFAULT_FEE);
    }

    #[test]
    fn ceiling_enforced() {
        let policy = FeePolicy::new(DropAmount::new(100));
        assert!(policy.enforce(DropAmount::new(100)).is_ok());
        assert!(matches!(
            policy.enforce(DropAmount::new(101)),
            Err(ConnectorError::FeeExceeded { .. })
        ));
    }
}
