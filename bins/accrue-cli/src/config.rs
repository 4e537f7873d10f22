//! CLI configuration loaded from environment variables.
//!
//! Command-line flags take precedence over everything here.

use anyhow::{Context, Result};
use accrue_core::hashing::HashScheme;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Log level filter string (e.g. "info", "accrue_cli=debug").
    pub log_level: String,
    /// Log output format ("text" or "json").
    pub log_format: String,
    /// Hash scheme used when building trees and verifying proofs.
    pub scheme: HashScheme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            scheme: HashScheme::CANONICAL,
        }
    }
}

impl Config {
    /// Load configuration from `ACCRUE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("ACCRUE_LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_format = lookup("ACCRUE_LOG_FORMAT").unwrap_or(defaults.log_format);

        let scheme = match lookup("ACCRUE_HASH_SCHEME") {
            Some(raw) => raw
                .parse::<HashScheme>()
                .with_context(|| format!("ACCRUE_HASH_SCHEME is not a valid scheme: {raw}"))?,
            None => defaults.scheme,
        };

        Ok(Config {
            log_level,
            log_format,
            scheme,
        })
    }
}
