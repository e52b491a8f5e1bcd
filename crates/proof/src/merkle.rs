//! Binary keccak256 Merkle commitments over the transactions of a block.

use crate::{ProofError, ProofResult};
use alloc::vec::Vec;
use alloy_primitives::{keccak256, B256};

/// Hashes an interior node.
fn hash_pair(left: B256, right: B256) -> B256 {
    let mut raw = [0u8; 64];
    raw[..32].copy_from_slice(left.as_slice());
    raw[32..].copy_from_slice(right.as_slice());
    keccak256(raw)
}

/// Returns the number of levels above the leaves of a tree with `leaf_count` leaves.
pub const fn tree_depth(leaf_count: u64) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (u64::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

/// Folds one level of the tree. An odd trailing node is paired with itself.
fn next_level(level: &[B256]) -> Vec<B256> {
    level.chunks(2).map(|pair| hash_pair(pair[0], pair[pair.len() - 1])).collect()
}

/// Computes the transactions root of an ordered list of transactions.
///
/// Leaves are `keccak256(tx)`. The root of an empty list is [B256::ZERO] and the root of a single
/// transaction is its leaf.
pub fn transactions_root<T: AsRef<[u8]>>(transactions: &[T]) -> B256 {
    let mut level: Vec<B256> = transactions.iter().map(|tx| keccak256(tx.as_ref())).collect();
    if level.is_empty() {
        return B256::ZERO;
    }
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// A proof that a transaction is included in a transactions root.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MerkleProof {
    /// The position of the transaction in the block.
    pub index: u64,
    /// The sibling hashes from the leaf level upward.
    pub siblings: Vec<B256>,
}

impl MerkleProof {
    /// Builds the inclusion proof of the transaction at `index`.
    pub fn build<T: AsRef<[u8]>>(transactions: &[T], index: u64) -> ProofResult<Self> {
        let leaf_count = transactions.len() as u64;
        if index >= leaf_count {
            return Err(ProofError::IndexOutOfRange { index, leaf_count });
        }

        let mut level: Vec<B256> = transactions.iter().map(|tx| keccak256(tx.as_ref())).collect();
        let mut position = index as usize;
        let mut siblings = Vec::with_capacity(tree_depth(leaf_count));
        while level.len() > 1 {
            let sibling = position ^ 1;
            siblings.push(level.get(sibling).copied().unwrap_or(level[position]));
            level = next_level(&level);
            position /= 2;
        }

        Ok(Self { index, siblings })
    }

    /// Computes the root this proof leads to from the given transaction.
    pub fn compute_root(&self, transaction: &[u8]) -> B256 {
        let mut position = self.index;
        self.siblings.iter().fold(keccak256(transaction), |node, sibling| {
            let parent =
                if position % 2 == 0 { hash_pair(node, *sibling) } else { hash_pair(*sibling, node) };
            position /= 2;
            parent
        })
    }

    /// Verifies that `transaction` sits at [MerkleProof::index] of a block with `leaf_count`
    /// transactions committed to by `root`.
    pub fn verify(&self, root: B256, transaction: &[u8], leaf_count: u64) -> ProofResult<()> {
        if self.index >= leaf_count {
            return Err(ProofError::IndexOutOfRange { index: self.index, leaf_count });
        }
        let expected = tree_depth(leaf_count);
        if self.siblings.len() != expected {
            return Err(ProofError::InvalidProofLength { expected, got: self.siblings.len() });
        }

        let computed = self.compute_root(transaction);
        if computed != root {
            return Err(ProofError::RootMismatch { expected: root, computed });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;
    use proptest::{collection::vec as prop_vec, prelude::*};

    fn txs(count: usize) -> Vec<Vec<u8>> {
        (0..count).map(|i| vec![i as u8, 0xAB]).collect()
    }

    #[test]
    fn test_small_roots() {
        assert_eq!(transactions_root::<Vec<u8>>(&[]), B256::ZERO);

        let one = txs(1);
        assert_eq!(transactions_root(&one), keccak256(&one[0]));

        let three = txs(3);
        let (a, b, c) = (keccak256(&three[0]), keccak256(&three[1]), keccak256(&three[2]));
        assert_eq!(transactions_root(&three), hash_pair(hash_pair(a, b), hash_pair(c, c)));
    }

    #[test]
    fn test_depth() {
        assert_eq!(tree_depth(1), 0);
        assert_eq!(tree_depth(2), 1);
        assert_eq!(tree_depth(3), 2);
        assert_eq!(tree_depth(100), 7);
    }

    #[test]
    fn test_rejects_wrong_transaction_and_length() {
        let txs = txs(5);
        let root = transactions_root(&txs);
        let proof = MerkleProof::build(&txs, 4).unwrap();

        assert!(matches!(
            proof.verify(root, &txs[3], 5),
            Err(ProofError::RootMismatch { .. })
        ));

        let mut short = proof.clone();
        short.siblings.pop();
        assert_eq!(
            short.verify(root, &txs[4], 5),
            Err(ProofError::InvalidProofLength { expected: 3, got: 2 })
        );
        assert_eq!(
            MerkleProof::build(&txs, 5),
            Err(ProofError::IndexOutOfRange { index: 5, leaf_count: 5 })
        );
    }

    proptest! {
        #[test]
        fn every_leaf_proves_inclusion(txs in prop_vec(prop_vec(any::<u8>(), 1..64), 1..64), seed in any::<usize>()) {
            let root = transactions_root(&txs);
            let index = (seed % txs.len()) as u64;
            let proof = MerkleProof::build(&txs, index).unwrap();
            prop_assert_eq!(proof.verify(root, &txs[index as usize], txs.len() as u64), Ok(()));
        }
    }
}
