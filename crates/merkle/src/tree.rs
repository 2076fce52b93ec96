//! Sorted-pair Merkle tree native implementation.
//!
//! Leaves are sorted byte-wise before the bottom level is laid out, and every
//! pair of siblings is sorted again before it is hashed. The root therefore
//! depends only on the multiset of leaves, and a proof only needs sibling
//! values, never left/right directions.
//!
//! An odd node at the end of a level is promoted to the next level unchanged.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::digest::{hash_pair, Digest};
use crate::error::MerkleError;
use crate::leaf::{LeafLayout, Record};
use crate::proof::MerkleProof;

/// Immutable Merkle tree over a non-empty sequence of leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    /// layers[0] = sorted leaves, last layer = [root]
    layers: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree from leaf digests in any order.
    ///
    /// Duplicate leaves are kept as separate positions.
    pub fn build<I>(leaves: I) -> Result<Self, MerkleError>
    where
        I: IntoIterator<Item = Digest>,
    {
        let mut leaves: Vec<Digest> = leaves.into_iter().collect();
        if leaves.is_empty() {
            return Err(MerkleError::EmptyLeafSet);
        }
        leaves.sort_unstable();

        let mut layers = vec![leaves];
        loop {
            let current = &layers[layers.len() - 1];
            if current.len() == 1 {
                break;
            }
            let next = Self::hash_level(current);
            layers.push(next);
        }

        Ok(Self { layers })
    }

    /// Encode and hash `records`, then build.
    pub fn from_records(records: &[Record], layout: LeafLayout) -> Result<Self, MerkleError> {
        #[cfg(feature = "parallel")]
        let leaves: Vec<Digest> = records.par_iter().map(|r| r.leaf(layout)).collect();
        #[cfg(not(feature = "parallel"))]
        let leaves: Vec<Digest> = records.iter().map(|r| r.leaf(layout)).collect();

        Self::build(leaves)
    }

    /// Hash one level into the next. Output order follows input order even
    /// when chunks are hashed on the rayon pool.
    fn hash_level(level: &[Digest]) -> Vec<Digest> {
        #[cfg(feature = "parallel")]
        {
            level.par_chunks(2).map(Self::combine).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            level.chunks(2).map(Self::combine).collect()
        }
    }

    fn combine(chunk: &[Digest]) -> Digest {
        match chunk {
            [left, right] => hash_pair(left, right),
            // Lone trailing node: promoted unchanged
            _ => chunk[0],
        }
    }

    /// The root digest.
    pub fn root(&self) -> Digest {
        self.layers[self.layers.len() - 1][0]
    }

    /// Generate the proof for `leaf`.
    ///
    /// Siblings are listed leaf-to-root. Levels where the node was promoted
    /// without a partner contribute nothing. With duplicate leaves the proof
    /// is for the first sorted position.
    pub fn proof(&self, leaf: &Digest) -> Result<MerkleProof, MerkleError> {
        let mut index = self
            .position(leaf)
            .ok_or(MerkleError::LeafNotFound(*leaf))?;

        let mut siblings = Vec::with_capacity(self.depth());
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling_index = index ^ 1; // Flip last bit to get sibling
            if let Some(sibling) = layer.get(sibling_index) {
                siblings.push(*sibling);
            }
            index >>= 1;
        }

        Ok(MerkleProof::new(siblings))
    }

    /// Proof for a record's leaf under `layout`.
    pub fn proof_for_record(
        &self,
        record: &Record,
        layout: LeafLayout,
    ) -> Result<MerkleProof, MerkleError> {
        self.proof(&record.leaf(layout))
    }

    fn position(&self, leaf: &Digest) -> Option<usize> {
        let leaves = &self.layers[0];
        let index = leaves.partition_point(|d| d < leaf);
        (leaves.get(index) == Some(leaf)).then_some(index)
    }

    /// Check whether `leaf` is committed in this tree.
    pub fn contains(&self, leaf: &Digest) -> bool {
        self.position(leaf).is_some()
    }

    /// Sorted leaves.
    pub fn leaves(&self) -> &[Digest] {
        &self.layers[0]
    }

    /// All levels, leaves first and root last.
    pub fn layers(&self) -> &[Vec<Digest>] {
        &self.layers
    }

    /// Number of hashing levels between the leaves and the root.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Number of leaves, duplicates included.
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    /// Always false: a tree cannot be built without leaves.
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }
}
