//! Sorted-pair Merkle tree over leaf digests.
//!
//! - Internal node: `node_hash(min(a, b) || max(a, b))` with the scheme's node primitive
//! - Odd-length levels pair the last element with itself
//! - A single leaf is its own root, with no hashing round applied
//!
//! Because pairs are sorted before hashing, proofs carry only sibling
//! digests and no left/right flags.

use crate::error::MerkleError;
use crate::hashing::HashScheme;
use crate::types::Hash256;

/// Build every level of the tree, `levels[0]` being the leaf digests and
/// the last level holding only the root.
pub fn build_levels(
    scheme: &HashScheme,
    leaves: &[Hash256],
) -> Result<Vec<Vec<Hash256>>, MerkleError> {
    if leaves.is_empty() {
        return Err(MerkleError::EmptyInput);
    }

    let mut levels = vec![leaves.to_vec()];
    loop {
        let current = &levels[levels.len() - 1];
        if current.len() == 1 {
            break;
        }
        let next = next_level(scheme, current);
        levels.push(next);
    }
    Ok(levels)
}

/// Fold one level into its parent level.
fn next_level(scheme: &HashScheme, level: &[Hash256]) -> Vec<Hash256> {
    level
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            scheme.node_hash(left, right)
        })
        .collect()
}

/// Compute the root directly, without retaining intermediate levels.
pub fn merkle_root(scheme: &HashScheme, leaves: &[Hash256]) -> Result<Hash256, MerkleError> {
    if leaves.is_empty() {
        return Err(MerkleError::EmptyInput);
    }
    let mut current = leaves.to_vec();
    while current.len() > 1 {
        current = next_level(scheme, &current);
    }
    Ok(current[0])
}

/// Extract the bottom-up sibling path for the leaf at `leaf_index`.
pub fn build_proof(levels: &[Vec<Hash256>], leaf_index: usize) -> Result<Vec<Hash256>, MerkleError> {
    let leaf_count = levels.first().map_or(0, Vec::len);
    if leaf_index >= leaf_count {
        return Err(MerkleError::LeafIndexOutOfRange {
            index: leaf_index,
            len: leaf_count,
        });
    }

    let mut proof = Vec::with_capacity(levels.len().saturating_sub(1));
    let mut index = leaf_index;

    for level in &levels[..levels.len() - 1] {
        if index >= level.len() {
            return Err(MerkleError::LeafIndexOutOfRange {
                index,
                len: level.len(),
            });
        }
        let sibling = if index % 2 == 0 {
            // Last element of an odd level is paired with itself.
            (index + 1).min(level.len() - 1)
        } else {
            index - 1
        };
        proof.push(level[sibling]);
        index /= 2;
    }

    Ok(proof)
}

/// Recompute the root from a leaf and its sibling path and compare.
///
/// An empty proof succeeds only when `leaf == root`.
pub fn verify(scheme: &HashScheme, leaf: &Hash256, proof: &[Hash256], root: &Hash256) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |acc, sibling| scheme.node_hash(&acc, sibling));
    computed == *root
}

/// Byte-level variant of [`verify`] for untrusted input.
///
/// Any leaf, sibling or root that is not exactly 32 bytes makes the proof
/// invalid; it is never reported as an error.
pub fn verify_bytes<P: AsRef<[u8]>>(
    scheme: &HashScheme,
    leaf: &[u8],
    proof: &[P],
    root: &[u8],
) -> bool {
    let (Some(leaf), Some(root)) = (Hash256::from_slice(leaf), Hash256::from_slice(root)) else {
        return false;
    };
    let Some(siblings) = proof
        .iter()
        .map(|p| Hash256::from_slice(p.as_ref()))
        .collect::<Option<Vec<_>>>()
    else {
        return false;
    };
    verify(scheme, &leaf, &siblings, &root)
}

/// Full tree supporting root lookup and proof generation.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    scheme: HashScheme,
    /// `levels[0]` = leaf digests, `levels[last]` = `[root]`.
    levels: Vec<Vec<Hash256>>,
}

impl MerkleTree {
    /// Build a tree from leaf digests.
    pub fn from_leaves(scheme: HashScheme, leaves: &[Hash256]) -> Result<Self, MerkleError> {
        Ok(Self {
            scheme,
            levels: build_levels(&scheme, leaves)?,
        })
    }

    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// The Merkle root.
    pub fn root(&self) -> Hash256 {
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of hashing rounds between a leaf and the root, which is also
    /// the length of every proof.
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }

    /// Leaf digest at `index`.
    pub fn leaf(&self, index: usize) -> Option<Hash256> {
        self.levels[0].get(index).copied()
    }

    pub fn levels(&self) -> &[Vec<Hash256>] {
        &self.levels
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<Vec<Hash256>, MerkleError> {
        build_proof(&self.levels, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashAlgorithm;

    const S: HashScheme = HashScheme::CANONICAL;

    fn h(byte: u8) -> Hash256 {
        Hash256([byte; 32])
    }

    fn leaves(n: usize) -> Vec<Hash256> {
        (0..n)
            .map(|i| HashAlgorithm::Sha256.digest(&[&(i as u64).to_le_bytes()]))
            .collect()
    }

    // --- build_levels ---

    #[test]
    fn empty_input_rejected() {
        assert_eq!(build_levels(&S, &[]), Err(MerkleError::EmptyInput));
        assert_eq!(merkle_root(&S, &[]), Err(MerkleError::EmptyInput));
        assert!(MerkleTree::from_leaves(S, &[]).is_err());
    }

    #[test]
    fn single_leaf_is_root_without_hashing() {
        let levels = build_levels(&S, &[h(0xAA)]).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0], vec![h(0xAA)]);
        assert_eq!(merkle_root(&S, &[h(0xAA)]).unwrap(), h(0xAA));
    }

    #[test]
    fn two_leaves() {
        let root = merkle_root(&S, &[h(1), h(2)]).unwrap();
        assert_eq!(root, S.node_hash(&h(1), &h(2)));
    }

    #[test]
    fn leaf_order_within_pair_is_irrelevant() {
        assert_eq!(
            merkle_root(&S, &[h(1), h(2)]).unwrap(),
            merkle_root(&S, &[h(2), h(1)]).unwrap()
        );
    }

    #[test]
    fn three_leaves_duplicates_last() {
        // Level 1: [node(a, b), node(c, c)]
        let n01 = S.node_hash(&h(1), &h(2));
        let n22 = S.node_hash(&h(3), &h(3));
        let expected = S.node_hash(&n01, &n22);
        assert_eq!(merkle_root(&S, &[h(1), h(2), h(3)]).unwrap(), expected);
    }

    #[test]
    fn level_sizes_halve_rounding_up() {
        let levels = build_levels(&S, &leaves(5)).unwrap();
        let sizes: Vec<usize> = levels.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 3, 2, 1]);
    }

    #[test]
    fn single_leaf_differs_from_two_identical() {
        let a = h(0xAA);
        assert_ne!(
            merkle_root(&S, &[a]).unwrap(),
            merkle_root(&S, &[a, a]).unwrap()
        );
    }

    #[test]
    fn tree_root_matches_standalone() {
        for count in 1..=10 {
            let l = leaves(count);
            let tree = MerkleTree::from_leaves(S, &l).unwrap();
            assert_eq!(tree.root(), merkle_root(&S, &l).unwrap(), "count={count}");
            assert_eq!(tree.leaf_count(), count);
        }
    }

    // --- build_proof ---

    #[test]
    fn proof_out_of_range() {
        let levels = build_levels(&S, &leaves(2)).unwrap();
        assert_eq!(
            build_proof(&levels, 2),
            Err(MerkleError::LeafIndexOutOfRange { index: 2, len: 2 })
        );
        assert!(build_proof(&[], 0).is_err());
    }

    #[test]
    fn proof_over_malformed_levels_is_error() {
        let l = leaves(4);
        let root = merkle_root(&S, &l).unwrap();
        let levels = vec![l.clone(), Vec::new(), vec![root]];
        assert_eq!(
            build_proof(&levels, 0),
            Err(MerkleError::LeafIndexOutOfRange { index: 0, len: 0 })
        );

        // Upper level too short for the climbing index.
        let levels = vec![l, vec![h(1)], vec![root]];
        assert_eq!(
            build_proof(&levels, 3),
            Err(MerkleError::LeafIndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn single_leaf_proof_is_empty() {
        let tree = MerkleTree::from_leaves(S, &[h(9)]).unwrap();
        let proof = tree.proof(0).unwrap();
        assert!(proof.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(verify(&S, &h(9), &proof, &tree.root()));
    }

    #[test]
    fn odd_last_leaf_sibling_is_itself() {
        let l = leaves(3);
        let tree = MerkleTree::from_leaves(S, &l).unwrap();
        let proof = tree.proof(2).unwrap();
        assert_eq!(proof[0], l[2]);
        assert!(verify(&S, &l[2], &proof, &tree.root()));
    }

    #[test]
    fn odd_index_sibling_is_left_neighbour() {
        let l = leaves(4);
        let tree = MerkleTree::from_leaves(S, &l).unwrap();
        assert_eq!(tree.proof(3).unwrap()[0], l[2]);
        assert_eq!(tree.proof(2).unwrap()[0], l[3]);
    }

    #[test]
    fn proof_depth() {
        let tree = MerkleTree::from_leaves(S, &leaves(8)).unwrap();
        assert_eq!(tree.proof(0).unwrap().len(), 3);
        let tree = MerkleTree::from_leaves(S, &leaves(5)).unwrap();
        assert_eq!(tree.proof(4).unwrap().len(), 3);
    }

    #[test]
    fn every_leaf_verifies() {
        for count in 1..=33 {
            let l = leaves(count);
            let tree = MerkleTree::from_leaves(S, &l).unwrap();
            for (i, leaf) in l.iter().enumerate() {
                let proof = tree.proof(i).unwrap();
                assert!(verify(&S, leaf, &proof, &tree.root()), "count={count} leaf={i}");
            }
        }
    }

    // --- verify failures ---

    #[test]
    fn wrong_root_fails() {
        let l = leaves(4);
        let tree = MerkleTree::from_leaves(S, &l).unwrap();
        let proof = tree.proof(0).unwrap();
        assert!(!verify(&S, &l[0], &proof, &h(0xFF)));
    }

    #[test]
    fn tampered_sibling_fails() {
        let l = leaves(4);
        let tree = MerkleTree::from_leaves(S, &l).unwrap();
        let mut proof = tree.proof(1).unwrap();
        proof[1].0[0] ^= 0x01;
        assert!(!verify(&S, &l[1], &proof, &tree.root()));
    }

    #[test]
    fn empty_proof_needs_leaf_equal_root() {
        assert!(verify(&S, &h(1), &[], &h(1)));
        assert!(!verify(&S, &h(1), &[], &h(2)));
    }

    #[test]
    fn truncated_proof_fails() {
        let l = leaves(8);
        let tree = MerkleTree::from_leaves(S, &l).unwrap();
        let proof = tree.proof(5).unwrap();
        assert!(!verify(&S, &l[5], &proof[..2], &tree.root()));
    }

    #[test]
    fn scheme_mismatch_fails_silently() {
        let l = leaves(6);
        let tree = MerkleTree::from_leaves(S, &l).unwrap();
        let proof = tree.proof(3).unwrap();
        let other = HashScheme::new(HashAlgorithm::Sha256, HashAlgorithm::Blake3);
        assert!(!verify(&other, &l[3], &proof, &tree.root()));
    }

    // --- verify_bytes ---

    #[test]
    fn verify_bytes_accepts_valid() {
        let l = leaves(3);
        let tree = MerkleTree::from_leaves(S, &l).unwrap();
        let proof: Vec<Vec<u8>> = tree.proof(1).unwrap().iter().map(|d| d.0.to_vec()).collect();
        assert!(verify_bytes(&S, &l[1].0, &proof, &tree.root().0));
    }

    #[test]
    fn verify_bytes_wrong_length_is_false() {
        let l = leaves(3);
        let tree = MerkleTree::from_leaves(S, &l).unwrap();
        let mut proof: Vec<Vec<u8>> =
            tree.proof(1).unwrap().iter().map(|d| d.0.to_vec()).collect();
        proof[0].pop();
        assert!(!verify_bytes(&S, &l[1].0, &proof, &tree.root().0));
        assert!(!verify_bytes::<Vec<u8>>(&S, &[0u8; 31], &[], &[0u8; 31]));
        assert!(!verify_bytes::<Vec<u8>>(&S, &l[0].0, &[], &[0u8; 33]));
    }
}
