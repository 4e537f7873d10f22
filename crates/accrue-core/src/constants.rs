//! Protocol constants shared by the off-ledger builder and the ledger.

/// Width of an account identifier in bytes.
pub const ACCOUNT_ID_LEN: usize = 32;

/// Width of an encoded cumulative amount in bytes (`u64`, little-endian).
pub const AMOUNT_LEN: usize = 8;

/// Length of a leaf pre-image: identifier followed by amount.
pub const LEAF_ENCODED_LEN: usize = ACCOUNT_ID_LEN + AMOUNT_LEN;

/// Length of every digest produced by a supported hash primitive.
pub const DIGEST_LEN: usize = 32;

/// Domain tag mixed into the vault account derivation.
pub const VAULT_SEED: &[u8] = b"accrue/vault/v1";

/// Format version stamped into exported proof bundles.
pub const PROOF_BUNDLE_VERSION: u32 = 1;
