//! Core value types: digests and account identifiers.
//!
//! Both are fixed 32-byte arrays. Amounts are plain `u64` base units.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::ACCOUNT_ID_LEN;
use crate::error::IdentifierError;

/// A 32-byte hash value.
///
/// Used for leaf digests, internal Merkle nodes and published roots.
/// The derived `Ord` compares bytes lexicographically, which is the
/// pair-sort rule used when hashing sibling nodes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero hash (32 zero bytes).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a Hash256 from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build a digest from an arbitrary slice. Returns `None` unless the
    /// slice is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(bytes).ok().map(Self)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero hash.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a 64-character hex string (optional `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
        let raw = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| IdentifierError::InvalidHex(e.to_string()))?;
        Self::from_slice(&raw).ok_or(IdentifierError::InvalidLength {
            got: raw.len(),
            expected: 32,
        })
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Fixed-width account identifier for beneficiaries, authorities and
/// the vault.
///
/// Stored as 32 big-endian bytes. Shorter identifiers are left-padded with
/// zeros so that, for example, the one-byte address `0x0a` and the 32-byte
/// address `0x00..0a` denote the same account.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct AccountId(pub [u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// Create an identifier from exactly 32 bytes.
    pub fn from_bytes(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Create an identifier from up to 32 big-endian bytes, left-padding
    /// with zeros.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, IdentifierError> {
        if bytes.len() > ACCOUNT_ID_LEN {
            return Err(IdentifierError::TooLong {
                len: bytes.len(),
                max: ACCOUNT_ID_LEN,
            });
        }
        let mut out = [0u8; ACCOUNT_ID_LEN];
        out[ACCOUNT_ID_LEN - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Identifier whose numeric big-endian value is `n`.
    pub fn from_u64(n: u64) -> Self {
        let mut out = [0u8; ACCOUNT_ID_LEN];
        out[ACCOUNT_ID_LEN - 8..].copy_from_slice(&n.to_be_bytes());
        Self(out)
    }

    /// Parse a hex identifier. Odd-length input gets an implicit leading
    /// zero nibble, and short input is left-padded.
    pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
        let digits = s.trim_start_matches("0x");
        if digits.is_empty() {
            return Err(IdentifierError::InvalidHex("empty identifier".into()));
        }
        let raw = if digits.len() % 2 == 1 {
            hex::decode(format!("0{digits}"))
        } else {
            hex::decode(digits)
        }
        .map_err(|e| IdentifierError::InvalidHex(e.to_string()))?;
        Self::from_be_slice(&raw)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; ACCOUNT_ID_LEN]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }
}

// Hex strings for human-readable formats (JSON bundles), raw arrays otherwise.

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&format!("0x{self}"))
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Self)
        }
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            <[u8; ACCOUNT_ID_LEN]>::deserialize(deserializer).map(Self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Hash256 ---

    #[test]
    fn hash_zero_is_zero() {
        assert!(Hash256::ZERO.is_zero());
        assert!(!Hash256([1; 32]).is_zero());
    }

    #[test]
    fn hash_from_slice_requires_exact_length() {
        assert_eq!(Hash256::from_slice(&[7u8; 32]), Some(Hash256([7; 32])));
        assert!(Hash256::from_slice(&[7u8; 31]).is_none());
        assert!(Hash256::from_slice(&[7u8; 33]).is_none());
        assert!(Hash256::from_slice(&[]).is_none());
    }

    #[test]
    fn hash_display_is_lowercase_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xAB;
        let s = Hash256(bytes).to_string();
        assert_eq!(s.len(), 64);
        assert!(s.starts_with("ab00"));
    }

    #[test]
    fn hash_hex_parse_matches_display() {
        let h = Hash256([0x5c; 32]);
        assert_eq!(Hash256::from_hex(&h.to_string()).unwrap(), h);
        assert_eq!(Hash256::from_hex(&format!("0x{h}")).unwrap(), h);
    }

    #[test]
    fn hash_hex_parse_rejects_short() {
        let err = Hash256::from_hex("abcd").unwrap_err();
        assert_eq!(err, IdentifierError::InvalidLength { got: 2, expected: 32 });
    }

    #[test]
    fn hash_ordering_is_bytewise() {
        let mut lo = [0xFF; 32];
        lo[0] = 0x00;
        let mut hi = [0x00; 32];
        hi[0] = 0x01;
        assert!(Hash256(lo) < Hash256(hi));
    }

    // --- AccountId ---

    #[test]
    fn account_left_pads_short_input() {
        let id = AccountId::from_be_slice(&[0x0a]).unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 0x0a;
        assert_eq!(id.0, expected);
    }

    #[test]
    fn account_rejects_long_input() {
        let err = AccountId::from_be_slice(&[1u8; 33]).unwrap_err();
        assert_eq!(err, IdentifierError::TooLong { len: 33, max: 32 });
    }

    #[test]
    fn account_from_u64_is_big_endian() {
        let id = AccountId::from_u64(0x0102);
        assert_eq!(id.0[30], 0x01);
        assert_eq!(id.0[31], 0x02);
        assert!(id.0[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn account_hex_accepts_odd_length_and_prefix() {
        assert_eq!(AccountId::from_hex("0xa").unwrap(), AccountId::from_u64(10));
        assert_eq!(AccountId::from_hex("1f4").unwrap(), AccountId::from_u64(500));
    }

    #[test]
    fn account_hex_rejects_garbage() {
        assert!(matches!(
            AccountId::from_hex("0xzz"),
            Err(IdentifierError::InvalidHex(_))
        ));
        assert!(AccountId::from_hex("0x").is_err());
    }

    #[test]
    fn json_uses_prefixed_hex() {
        let json = serde_json::to_string(&AccountId::from_u64(1)).unwrap();
        assert_eq!(json, format!("\"0x{}01\"", "00".repeat(31)));
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AccountId::from_u64(1));

        let h = Hash256([0x11; 32]);
        let back: Hash256 = serde_json::from_str(&serde_json::to_string(&h).unwrap()).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn json_rejects_bad_digest() {
        assert!(serde_json::from_str::<Hash256>("\"0x1234\"").is_err());
    }

    #[test]
    fn account_display_roundtrips_through_from_str() {
        let id = AccountId::from_u64(0xdead_beef);
        let parsed: AccountId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
