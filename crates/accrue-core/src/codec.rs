//! Leaf encoding.
//!
//! A leaf commits to one `(beneficiary, cumulative_amount)` pair. The
//! pre-image is a fixed 40-byte layout:
//!
//! ```text
//! beneficiary (32 bytes, big-endian, left-padded) || amount (8 bytes, little-endian)
//! ```
//!
//! and the leaf digest is the scheme's leaf primitive applied once to it.

use crate::constants::{ACCOUNT_ID_LEN, LEAF_ENCODED_LEN};
use crate::hashing::HashScheme;
use crate::types::{AccountId, Hash256};

/// Encode a leaf pre-image.
pub fn encode_leaf(beneficiary: &AccountId, cumulative_amount: u64) -> [u8; LEAF_ENCODED_LEN] {
    let mut out = [0u8; LEAF_ENCODED_LEN];
    out[..ACCOUNT_ID_LEN].copy_from_slice(beneficiary.as_bytes());
    out[ACCOUNT_ID_LEN..].copy_from_slice(&cumulative_amount.to_le_bytes());
    out
}

/// Compute the leaf digest for a beneficiary's cumulative entitlement.
pub fn hash_leaf(scheme: &HashScheme, beneficiary: &AccountId, cumulative_amount: u64) -> Hash256 {
    scheme
        .leaf
        .digest(&[&encode_leaf(beneficiary, cumulative_amount)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashAlgorithm;

    #[test]
    fn encoding_layout() {
        let id = AccountId::from_u64(0xA1);
        let enc = encode_leaf(&id, 500);
        assert_eq!(enc.len(), 40);
        assert_eq!(enc[31], 0xA1);
        assert!(enc[..31].iter().all(|b| *b == 0));
        // 500 = 0x01F4, little-endian
        assert_eq!(&enc[32..], &[0xF4, 0x01, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn encoding_max_amount() {
        let enc = encode_leaf(&AccountId::default(), u64::MAX);
        assert_eq!(&enc[32..], &[0xFF; 8]);
    }

    #[test]
    fn hash_is_single_pass_over_preimage() {
        let id = AccountId::from_u64(7);
        let expected = HashAlgorithm::Sha256.digest(&[&encode_leaf(&id, 42)]);
        assert_eq!(hash_leaf(&HashScheme::CANONICAL, &id, 42), expected);
    }

    #[test]
    fn hash_changes_with_amount_and_beneficiary() {
        let s = HashScheme::CANONICAL;
        let a = AccountId::from_u64(1);
        let b = AccountId::from_u64(2);
        assert_ne!(hash_leaf(&s, &a, 10), hash_leaf(&s, &a, 11));
        assert_ne!(hash_leaf(&s, &a, 10), hash_leaf(&s, &b, 10));
    }

    #[test]
    fn hash_follows_leaf_primitive() {
        let id = AccountId::from_u64(3);
        let blake = HashScheme::new(HashAlgorithm::Blake3, HashAlgorithm::Sha256);
        assert_ne!(
            hash_leaf(&blake, &id, 1),
            hash_leaf(&HashScheme::CANONICAL, &id, 1)
        );
    }

    #[test]
    fn padded_identifiers_hash_identically() {
        let s = HashScheme::CANONICAL;
        let short = AccountId::from_be_slice(&[0x0a]).unwrap();
        let full = AccountId::from_hex(&format!("{:064x}", 10)).unwrap();
        assert_eq!(hash_leaf(&s, &short, 99), hash_leaf(&s, &full, 99));
    }
}
