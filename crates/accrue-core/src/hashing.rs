//! Hash primitives for leaves and internal Merkle nodes.
//!
//! The leaf primitive and the internal-node primitive are pinned separately
//! in a [`HashScheme`]. The off-ledger builder and the ledger's verifier must
//! use the same scheme byte for byte; a mismatch does not raise an error, it
//! simply makes every proof fail verification.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::IdentifierError;
use crate::types::Hash256;

/// A 32-byte cryptographic hash function.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    /// SHA-256 (FIPS 180-4).
    Sha256,
    /// BLAKE3 in default hashing mode.
    Blake3,
}

impl HashAlgorithm {
    /// Hash the concatenation of `parts`.
    pub fn digest(&self, parts: &[&[u8]]) -> Hash256 {
        match self {
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                for part in parts {
                    hasher.update(part);
                }
                Hash256(hasher.finalize().into())
            }
            Self::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                for part in parts {
                    hasher.update(part);
                }
                Hash256(hasher.finalize().into())
            }
        }
    }

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha2-256" | "sha-256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            other => Err(IdentifierError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// The pair of primitives a distribution is committed under.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
pub struct HashScheme {
    /// Applied once to each encoded leaf.
    pub leaf: HashAlgorithm,
    /// Applied to each sorted sibling pair.
    pub node: HashAlgorithm,
}

impl HashScheme {
    /// The pinned scheme: SHA-256 for leaves and SHA-256 for internal nodes.
    pub const CANONICAL: Self = Self {
        leaf: HashAlgorithm::Sha256,
        node: HashAlgorithm::Sha256,
    };

    pub const fn new(leaf: HashAlgorithm, node: HashAlgorithm) -> Self {
        Self { leaf, node }
    }

    /// Hash a sibling pair. The smaller digest (by byte value) goes first,
    /// so the result does not depend on which side each node came from.
    pub fn node_hash(&self, a: &Hash256, b: &Hash256) -> Hash256 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.node.digest(&[lo.as_bytes(), hi.as_bytes()])
    }
}

impl Default for HashScheme {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl fmt::Display for HashScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.leaf, self.node)
    }
}

/// Parses `"<leaf>/<node>"`, or a single name used for both.
impl FromStr for HashScheme {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((leaf, node)) => Ok(Self::new(leaf.trim().parse()?, node.trim().parse()?)),
            None => {
                let algo: HashAlgorithm = s.trim().parse()?;
                Ok(Self::new(algo, algo))
            }
        }
    }
}
