//! Producer side: build the whitelist tree and hand out proofs.

use thiserror::Error;
use whitelist_merkle::{Digest, Identity, LeafLayout, MerkleError, MerkleProof, MerkleTree, Record};

/// Errors during tree building and artifact export
#[derive(Error, Debug)]
pub enum ProveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    #[error("Invalid record at index {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: MerkleError,
    },
    #[error("Identity {0} is not whitelisted")]
    UnknownIdentity(Identity),
}

/// A proof together with the record it opens
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofWithRecord {
    pub record: Record,
    pub leaf: Digest,
    pub proof: MerkleProof,
}

/// A built whitelist: the input records plus the tree over their leaves.
#[derive(Clone, Debug)]
pub struct WhitelistTree {
    records: Vec<Record>,
    layout: LeafLayout,
    tree: MerkleTree,
}

impl WhitelistTree {
    /// Encode, hash and commit `records`.
    pub fn build(records: Vec<Record>, layout: LeafLayout) -> Result<Self, ProveError> {
        let tree = MerkleTree::from_records(&records, layout)?;
        tracing::info!(
            records = records.len(),
            depth = tree.depth(),
            %layout,
            root = %tree.root(),
            "built whitelist tree"
        );
        Ok(Self {
            records,
            layout,
            tree,
        })
    }

    pub fn root(&self) -> Digest {
        self.tree.root()
    }

    pub fn layout(&self) -> LeafLayout {
        self.layout
    }

    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    /// Input records in feed order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Proof for an exact record.
    pub fn prove(&self, record: &Record) -> Result<ProofWithRecord, ProveError> {
        let leaf = record.leaf(self.layout);
        let proof = self.tree.proof(&leaf)?;
        tracing::debug!(identity = %record.identity, siblings = proof.len(), "generated proof");
        Ok(ProofWithRecord {
            record: *record,
            leaf,
            proof,
        })
    }

    /// Proof for the first feed entry with `identity`, whatever its count.
    pub fn prove_identity(&self, identity: &Identity) -> Result<ProofWithRecord, ProveError> {
        let record = self
            .records
            .iter()
            .find(|r| r.identity == *identity)
            .ok_or(ProveError::UnknownIdentity(*identity))?;
        self.prove(record)
    }

    /// Proofs for every record, in feed order.
    pub fn prove_all(&self) -> Result<Vec<ProofWithRecord>, ProveError> {
        self.records.iter().map(|r| self.prove(r)).collect()
    }
}
