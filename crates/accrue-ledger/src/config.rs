//! Ledger configuration.
//!
//! Provides [`LedgerConfig`]: the fixed deployer identity and the hash scheme
//! proofs are verified under. Hosts can build it programmatically or load it
//! from JSON.

use accrue_core::hashing::HashScheme;
use accrue_core::types::AccountId;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Configuration for one distribution deployment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Identity allowed to run `initialize`, and the first authority.
    pub deployer: AccountId,
    /// Must match the scheme used by the off-ledger builder.
    #[serde(default)]
    pub scheme: HashScheme,
}

impl LedgerConfig {
    /// Config for `deployer` under [`HashScheme::CANONICAL`].
    pub fn new(deployer: AccountId) -> Self {
        Self {
            deployer,
            scheme: HashScheme::CANONICAL,
        }
    }

    pub fn with_scheme(mut self, scheme: HashScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Parse a JSON document such as
    /// `{"deployer": "0x..", "scheme": {"leaf": "sha256", "node": "sha256"}}`.
    pub fn from_json(s: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accrue_core::hashing::HashAlgorithm;

    #[test]
    fn default_scheme_is_canonical() {
        let cfg = LedgerConfig::new(AccountId::from_u64(1));
        assert_eq!(cfg.scheme, HashScheme::CANONICAL);
    }

    #[test]
    fn json_without_scheme_uses_canonical() {
        let json = format!(r#"{{"deployer":"{}"}}"#, AccountId::from_u64(7));
        let cfg = LedgerConfig::from_json(&json).unwrap();
        assert_eq!(cfg.deployer, AccountId::from_u64(7));
        assert_eq!(cfg.scheme, HashScheme::CANONICAL);
    }

    #[test]
    fn json_with_scheme() {
        let json = r#"{"deployer":"0x2a","scheme":{"leaf":"sha256","node":"blake3"}}"#;
        let cfg = LedgerConfig::from_json(json).unwrap();
        assert_eq!(cfg.deployer, AccountId::from_u64(42));
        assert_eq!(cfg.scheme.node, HashAlgorithm::Blake3);
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(
            LedgerConfig::from_json(r#"{"deployer":"0xzz"}"#),
            Err(LedgerError::Config(_))
        ));
    }
}
