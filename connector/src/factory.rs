//! Name-to-backend construction.
//!
//! The known connector set is a typed variant enum behind a static match;
//! adding a backend means adding a variant and a match arm, not modifying
//! the dispatcher. Construction is atomic: either a fully usable backend is
//! returned or nothing is allocated.

use std::str::FromStr;
use std::sync::Arc;

use chainscribe_rpc::{HttpEthereumRpc, WsLedgerRpc};

use crate::backend::LedgerBackend;
use crate::config::ConnectorConfig;
use crate::error::ConnectorError;
use crate::ethereum::EthereumBackend;
use crate::ripple::RippleBackend;

/// The fixed set of known backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorKind {
    Ripple,
    Ethereum,
}

impl ConnectorKind {
    /// URI scheme prefixes this backend accepts.
    fn accepted_schemes(&self) -> &'static [&'static str] {
        match self {
            Self::Ripple => &["wss://", "ws://", "wss+unix://", "ws+unix://"],
            Self::Ethereum => &["ws://", "http://", "https://"],
        }
    }
}

impl FromStr for ConnectorKind {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ripple" => Ok(Self::Ripple),
            "ethereum" => Ok(Self::Ethereum),
            other => Err(ConnectorError::UnknownConnector(other.to_string())),
        }
    }
}

/// Maps a backend name to a constructed backend instance.
pub struct ConnectorFactory;

impl ConnectorFactory {
    /// Construct the backend named `kind` from `config`.
    ///
    /// All validation happens before any resource is allocated: the kind
    /// must be known, the server URI must match the backend's accepted
    /// schemes, and configured accounts must be syntactically well-formed.
    pub fn create(
        kind: &str,
        config: &ConnectorConfig,
    ) -> Result<Box<dyn LedgerBackend>, ConnectorError> {
        let kind = ConnectorKind::from_str(kind)?;
        check_server_uri(&config.server, kind)?;
        check_accounts(config)?;

        match kind {
            ConnectorKind::Ripple => {
                let rpc = Arc::new(WsLedgerRpc::new(&config.server));
                Ok(Box::new(RippleBackend::from_config(rpc, config)?))
            }
            ConnectorKind::Ethereum => {
                let rpc = Arc::new(
                    HttpEthereumRpc::new(&config.server)
                        .map_err(|e| ConnectorError::Configuration(e.to_string()))?,
                );
                Ok(Box::new(EthereumBackend::from_config(rpc, config)?))
            }
        }
    }
}

fn check_server_uri(server: &str, kind: ConnectorKind) -> Result<(), ConnectorError> {
    if kind
        .accepted_schemes()
        .iter()
        .any(|scheme| server.starts_with(scheme))
    {
        Ok(())
    } else {
        Err(ConnectorError::Configuration(format!(
            "invalid server address: {server}"
        )))
    }
}

fn check_accounts(config: &ConnectorConfig) -> Result<(), ConnectorError> {
    for account in [&config.source, &config.target].into_iter().flatten() {
        if !account.is_valid() {
            return Err(ConnectorError::Configuration(format!(
                "incorrect account: {}",
                account.address
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainscribe_types::AccountCredential;

    fn config(connector: &str, server: &str) -> ConnectorConfig {
        ConnectorConfig {
            connector: connector.into(),
            server: server.into(),
            source: Some(AccountCredential::new("SRC1", "SEC1")),
            target: Some(AccountCredential::new("TGT1", "SEC2")),
            max_fee: None,
            contract: Some("0xc0ffee".into()),
            gas_limit: None,
        }
    }

    #[test]
    fn unknown_kind_rejected() {
        let err = ConnectorFactory::create("stellar", &config("stellar", "wss://x")).unwrap_err();
        assert!(matches!(err, ConnectorError::UnknownConnector(_)));
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!("Ripple".parse::<ConnectorKind>().unwrap(), ConnectorKind::Ripple);
        assert_eq!("ETHEREUM".parse::<ConnectorKind>().unwrap(), ConnectorKind::Ethereum);
    }

    #[test]
    fn ripple_rejects_http_uri() {
        let err = ConnectorFactory::create("ripple", &config("ripple", "http://x")).unwrap_err();
        assert!(matches!(err, ConnectorError::Configuration(_)));
    }

    #[test]
    fn ripple_accepts_wss_uri() {
        assert!(ConnectorFactory::create("ripple", &config("ripple", "wss://x")).is_ok());
    }

    #[test]
    fn ethereum_accepts_https_uri() {
        assert!(ConnectorFactory::create("ethereum", &config("ethereum", "https://x")).is_ok());
    }

    #[test]
    fn malformed_account_rejected_before_any_connection() {
        let mut cfg = config("ripple", "wss://x");
        cfg.source = Some(AccountCredential::new("has spaces", "SEC1"));
        let err = ConnectorFactory::create("ripple", &cfg).unwrap_err();
        assert!(matches!(err, ConnectorError::Configuration(_)));
    }

    #[test]
    fn ripple_requires_both_accounts() {
        let mut cfg = config("ripple", "wss://x");
        cfg.target = None;
        assert!(ConnectorFactory::create("ripple", &cfg).is_err());
    }

    #[test]
    fn ethereum_account_is_optional() {
        let mut cfg = config("ethereum", "https://x");
        cfg.source = None;
        cfg.target = None;
        assert!(ConnectorFactory::create("ethereum", &cfg).is_ok());
    }

    #[test]
    fn ethereum_requires_contract() {
        let mut cfg = config("ethereum", "https://x");
        cfg.contract = None;
        assert!(ConnectorFactory::create("ethereum", &cfg).is_err());
    }
}
