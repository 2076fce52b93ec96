//! Error taxonomy shared by encoding, tree construction and verification.

use thiserror::Error;

use crate::digest::Digest;

/// Errors surfaced by the whitelist Merkle core.
///
/// A proof that simply fails to reproduce the root is not an error; the
/// verifier reports it as `false`. Only structurally invalid input ends up
/// here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("Invalid identity width: expected {expected} bytes, got {got}")]
    InvalidIdentityWidth { expected: usize, got: usize },
    #[error("Invalid count: {0}")]
    InvalidCount(String),
    #[error("Cannot build a tree from an empty leaf set")]
    EmptyLeafSet,
    #[error("Leaf {0} is not in the tree")]
    LeafNotFound(Digest),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

impl MerkleError {
    /// Re-label encoder and parsing failures as verification-time input errors.
    pub(crate) fn into_malformed(self) -> Self {
        match self {
            MerkleError::MalformedInput(_) => self,
            other => MerkleError::MalformedInput(other.to_string()),
        }
    }
}
