//! Connector configuration.

use chainscribe_types::{AccountCredential, DropAmount};
use serde::Deserialize;

use crate::fee;

/// Configuration consumed by the connector factory.
///
/// Loaded from TOML by the CLI; backends receive the already-validated
/// pieces, never the whole struct.
#[derive(Clone, Debug, Deserialize)]
pub struct ConnectorConfig {
    /// Backend name: `ripple` or `ethereum`.
    pub connector: String,
    /// Ledger server URI. `wss://`/`ws://` for ripple, `ws://`/`http://`/
    /// `https://` for ethereum.
    pub server: String,
    /// Account sourcing transactions. Required for ripple; for ethereum it
    /// is the optional signing account (absent means read-only).
    pub source: Option<AccountCredential>,
    /// Account receiving the minimal transfer. Required for ripple, unused
    /// by ethereum.
    pub target: Option<AccountCredential>,
    /// Fee ceiling in drops. Defaults to [`fee::DEFAULT_MAX_FEE`].
    pub max_fee: Option<u64>,
    /// Storage contract address (ethereum only).
    pub contract: Option<String>,
    /// Gas ceiling per transaction (ethereum only).
    pub gas_limit: Option<u64>,
}

impl ConnectorConfig {
    pub fn max_fee(&self) -> DropAmount {
        self.max_fee
            .map(|raw| DropAmount::new(raw.into()))
            .unwrap_or(fee::DEFAULT_MAX_FEE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_parses() {
        let config: ConnectorConfig = toml::from_str(
            r#"
            connector = "ripple"
            server = "wss://s.altnet.rippletest.net:51233"

            [source]
            address = "SRC1"
            secret = "SEC1"

            [target]
            address = "TGT1"
            secret = "SEC2"
            "#,
        )
        .unwrap();
        assert_eq!(config.connector, "ripple");
        assert_eq!(config.max_fee(), fee::DEFAULT_MAX_FEE);
        assert_eq!(config.source.unwrap().address, "SRC1");
    }

    #[test]
    fn explicit_max_fee_wins() {
        let config: ConnectorConfig = toml::from_str(
            r#"
            connector = "ripple"
            server = "wss://example.test"
            max_fee = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.max_fee(), DropAmount::new(20));
    }
}
