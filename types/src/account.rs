//! Account credentials: a public address paired with a signing secret.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A signing secret, wiped from memory on drop and redacted from `Debug`.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Expose the raw secret for signing. Callers must not log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<redacted>)")
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A ledger account: public address plus the secret that signs on its behalf.
///
/// Validation is syntactic only — both fields must be non-empty and
/// alphanumeric. A credential failing [`AccountCredential::is_valid`] is
/// never used to source a transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountCredential {
    pub address: String,
    secret: Secret,
}

impl AccountCredential {
    pub fn new(address: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            secret: Secret::new(secret.into()),
        }
    }

    /// The signing secret.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// Whether both address and secret are well-formed.
    pub fn is_valid(&self) -> bool {
        is_alphanumeric(&self.address) && is_alphanumeric(self.secret.expose())
    }
}

fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}
