//! # accrue-core
//! Leaf codec, hash primitives and the sorted-pair Merkle engine shared by
//! the off-ledger builder and the distribution ledger.

pub mod codec;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod hashing;
pub mod merkle;
pub mod types;

pub use codec::{encode_leaf, hash_leaf};
pub use distribution::{ClaimProof, Distribution, Entitlement, ProofBundle};
pub use hashing::{HashAlgorithm, HashScheme};
pub use merkle::{MerkleTree, build_levels, build_proof, verify, verify_bytes};
pub use types::{AccountId, Hash256};
