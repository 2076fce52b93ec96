//! Merkle proof structure for whitelist membership verification.

use serde::{Deserialize, Serialize};

use crate::digest::{hash_pair, Digest};
use crate::error::MerkleError;
use crate::leaf::{LeafLayout, Record};

/// A Merkle proof for one leaf.
///
/// Holds sibling hashes from leaf level to root. No direction bits are
/// needed because siblings are always combined with the sorted-pair rule.
/// Serializes as a plain array of `0x`-hex strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerkleProof {
    siblings: Vec<Digest>,
}

impl MerkleProof {
    pub fn new(siblings: Vec<Digest>) -> Self {
        Self { siblings }
    }

    /// Parse wire-format siblings (`0x`-prefixed 64-hex-char strings).
    pub fn from_hex<S: AsRef<str>>(siblings: &[S]) -> Result<Self, MerkleError> {
        let siblings = siblings
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<Digest>, _>>()?;
        Ok(Self { siblings })
    }

    /// Wire format: one `0x`-hex string per sibling.
    pub fn to_hex(&self) -> Vec<String> {
        self.siblings.iter().map(Digest::to_hex).collect()
    }

    pub fn siblings(&self) -> &[Digest] {
        &self.siblings
    }

    pub fn into_siblings(self) -> Vec<Digest> {
        self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Fold the siblings onto `leaf` and return the implied root.
    pub fn compute_root_from_leaf(&self, leaf: Digest) -> Digest {
        self.siblings
            .iter()
            .fold(leaf, |current, sibling| hash_pair(&current, sibling))
    }

    /// Compute the implied root for a record's leaf.
    pub fn compute_root(&self, record: &Record, layout: LeafLayout) -> Digest {
        self.compute_root_from_leaf(record.leaf(layout))
    }
}

impl From<Vec<Digest>> for MerkleProof {
    fn from(siblings: Vec<Digest>) -> Self {
        Self::new(siblings)
    }
}
