//! Error types for the Accrue core crate.
use thiserror::Error;

use crate::types::AccountId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("cannot build a tree from zero leaves")] EmptyInput,
    #[error("leaf index out of range: {index} >= {len}")] LeafIndexOutOfRange { index: usize, len: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier too long: {len} > {max} bytes")] TooLong { len: usize, max: usize },
    #[error("invalid length: got {got}, expected {expected}")] InvalidLength { got: usize, expected: usize },
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("unknown hash algorithm: {0}")] UnknownAlgorithm(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributionBuildError {
    #[error("duplicate beneficiary: {0}")] DuplicateBeneficiary(AccountId),
    #[error("total entitlement overflows u64")] Overflow,
    #[error("unsupported bundle version: {0}")] UnsupportedVersion(u32),
    #[error("bundle root {declared} does not match rebuilt root {rebuilt}")] RootMismatch { declared: String, rebuilt: String },
    #[error("bundle total {declared} does not match rebuilt total {rebuilt}")] TotalMismatch { declared: u64, rebuilt: u64 },
    #[error("serialization: {0}")] Serialization(String),
    #[error(transparent)] Merkle(#[from] MerkleError),
}
