//! Off-ledger distribution builder.
//!
//! An operator collects every beneficiary's cumulative entitlement, builds
//! the tree once, publishes the root and hands each beneficiary their
//! [`ClaimProof`]. Leaf order follows input order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::codec::hash_leaf;
use crate::constants::PROOF_BUNDLE_VERSION;
use crate::error::DistributionBuildError;
use crate::hashing::HashScheme;
use crate::merkle::{self, MerkleTree};
use crate::types::{AccountId, Hash256};

/// One beneficiary's cumulative entitlement as of a given root.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entitlement {
    pub beneficiary: AccountId,
    /// Total ever owed, not the increment since the previous root.
    #[serde(alias = "amount")]
    pub cumulative_amount: u64,
}

impl Entitlement {
    pub fn new(beneficiary: AccountId, cumulative_amount: u64) -> Self {
        Self {
            beneficiary,
            cumulative_amount,
        }
    }
}

/// Everything a claimant needs to submit a claim.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct ClaimProof {
    pub beneficiary: AccountId,
    pub cumulative_amount: u64,
    pub leaf_index: usize,
    /// Sibling digests, leaf level first.
    pub proof: Vec<Hash256>,
}

impl ClaimProof {
    /// Check this claim against `root` under `scheme`.
    pub fn verify(&self, scheme: &HashScheme, root: &Hash256) -> bool {
        let leaf = hash_leaf(scheme, &self.beneficiary, self.cumulative_amount);
        merkle::verify(scheme, &leaf, &self.proof, root)
    }
}

/// A built distribution: entitlements, their tree and a beneficiary index.
#[derive(Clone, Debug)]
pub struct Distribution {
    entries: Vec<Entitlement>,
    tree: MerkleTree,
    index: HashMap<AccountId, usize>,
    total_entitled: u64,
}

impl Distribution {
    /// Build the tree over `entries`.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::EmptyInput`](crate::error::MerkleError::EmptyInput) for no entries
    /// - [`DistributionBuildError::DuplicateBeneficiary`] if a beneficiary appears twice
    /// - [`DistributionBuildError::Overflow`] if the entitlements sum past `u64::MAX`
    pub fn build(
        scheme: HashScheme,
        entries: Vec<Entitlement>,
    ) -> Result<Self, DistributionBuildError> {
        let mut index = HashMap::with_capacity(entries.len());
        let mut total: u64 = 0;
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.beneficiary, i).is_some() {
                return Err(DistributionBuildError::DuplicateBeneficiary(entry.beneficiary));
            }
            total = total
                .checked_add(entry.cumulative_amount)
                .ok_or(DistributionBuildError::Overflow)?;
        }

        let leaves: Vec<Hash256> = entries
            .iter()
            .map(|e| hash_leaf(&scheme, &e.beneficiary, e.cumulative_amount))
            .collect();
        let tree = MerkleTree::from_leaves(scheme, &leaves)?;

        Ok(Self {
            entries,
            tree,
            index,
            total_entitled: total,
        })
    }

    pub fn scheme(&self) -> HashScheme {
        self.tree.scheme()
    }

    /// Root to publish on the ledger.
    pub fn root(&self) -> Hash256 {
        self.tree.root()
    }

    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    pub fn entries(&self) -> &[Entitlement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all cumulative entitlements.
    pub fn total_entitled(&self) -> u64 {
        self.total_entitled
    }

    /// Claim for a single beneficiary, or `None` if they are not in this
    /// distribution.
    pub fn proof_for(&self, beneficiary: &AccountId) -> Option<ClaimProof> {
        let &i = self.index.get(beneficiary)?;
        self.claim_at(i)
    }

    /// Claims for every beneficiary, in leaf order.
    pub fn claims(&self) -> Vec<ClaimProof> {
        (0..self.entries.len())
            .filter_map(|i| self.claim_at(i))
            .collect()
    }

    fn claim_at(&self, i: usize) -> Option<ClaimProof> {
        let entry = self.entries.get(i)?;
        let proof = self.tree.proof(i).ok()?;
        Some(ClaimProof {
            beneficiary: entry.beneficiary,
            cumulative_amount: entry.cumulative_amount,
            leaf_index: i,
            proof,
        })
    }

    /// Export as a self-describing bundle.
    pub fn to_bundle(&self) -> ProofBundle {
        ProofBundle {
            version: PROOF_BUNDLE_VERSION,
            scheme: self.scheme(),
            root: self.root(),
            total_entitled: self.total_entitled,
            claims: self.claims(),
        }
    }

    /// Rebuild from a bundle, checking that the declared root and total match.
    pub fn from_bundle(bundle: &ProofBundle) -> Result<Self, DistributionBuildError> {
        if bundle.version != PROOF_BUNDLE_VERSION {
            return Err(DistributionBuildError::UnsupportedVersion(bundle.version));
        }
        let mut claims = bundle.claims.clone();
        claims.sort_by_key(|c| c.leaf_index);
        let entries = claims
            .iter()
            .map(|c| Entitlement::new(c.beneficiary, c.cumulative_amount))
            .collect();
        let dist = Self::build(bundle.scheme, entries)?;
        if dist.root() != bundle.root {
            return Err(DistributionBuildError::RootMismatch {
                declared: bundle.root.to_string(),
                rebuilt: dist.root().to_string(),
            });
        }
        if dist.total_entitled() != bundle.total_entitled {
            return Err(DistributionBuildError::TotalMismatch {
                declared: bundle.total_entitled,
                rebuilt: dist.total_entitled(),
            });
        }
        Ok(dist)
    }
}

/// Serialisable root plus per-beneficiary proofs.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct ProofBundle {
    pub version: u32,
    pub scheme: HashScheme,
    pub root: Hash256,
    pub total_entitled: u64,
    pub claims: Vec<ClaimProof>,
}

impl ProofBundle {
    pub fn to_json(&self) -> Result<String, DistributionBuildError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DistributionBuildError::Serialization(e.to_string()))
    }

    pub fn from_json(s: &str) -> Result<Self, DistributionBuildError> {
        serde_json::from_str(s).map_err(|e| DistributionBuildError::Serialization(e.to_string()))
    }

    /// Compact binary form, for transport where JSON is too large.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DistributionBuildError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| DistributionBuildError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DistributionBuildError> {
        let (bundle, read): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| DistributionBuildError::Serialization(e.to_string()))?;
        if read != bytes.len() {
            return Err(DistributionBuildError::Serialization(format!(
                "{} trailing bytes",
                bytes.len() - read
            )));
        }
        Ok(bundle)
    }

    pub fn find(&self, beneficiary: &AccountId) -> Option<&ClaimProof> {
        self.claims.iter().find(|c| c.beneficiary == *beneficiary)
    }
}
