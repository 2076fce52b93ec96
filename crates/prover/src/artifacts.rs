//! Published whitelist artifacts.
//!
//! The bundle carries the root to deploy plus one precomputed proof per
//! record, so claimants can fetch their proof without the producer keeping
//! the tree around.

use std::path::Path;

use serde::{Deserialize, Serialize};
use whitelist_merkle::{verify_record, Digest, Identity, LeafLayout, MerkleProof, Record};

use crate::prove::{ProveError, WhitelistTree};

/// Proof bundle entry for a single record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub address: Identity,
    pub count: u64,
    /// Canonical leaf encoding, `0x`-hex
    pub encoded: String,
    pub leaf: Digest,
    pub proof: MerkleProof,
}

impl ArtifactEntry {
    pub fn record(&self) -> Record {
        Record::new(self.address, self.count)
    }
}

/// Root plus per-record proofs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistArtifacts {
    pub root: Digest,
    pub layout: LeafLayout,
    pub entries: Vec<ArtifactEntry>,
}

impl WhitelistArtifacts {
    /// Collect the root and every record's proof from a built tree.
    pub fn from_tree(whitelist: &WhitelistTree) -> Result<Self, ProveError> {
        let layout = whitelist.layout();
        let entries = whitelist
            .prove_all()?
            .into_iter()
            .map(|p| ArtifactEntry {
                address: p.record.identity,
                count: p.record.count,
                encoded: format!("0x{}", hex::encode(p.record.encode(layout))),
                leaf: p.leaf,
                proof: p.proof,
            })
            .collect();

        Ok(Self {
            root: whitelist.root(),
            layout,
            entries,
        })
    }

    /// First entry for `identity`.
    pub fn entry_for(&self, identity: &Identity) -> Option<&ArtifactEntry> {
        self.entries.iter().find(|e| e.address == *identity)
    }

    /// Check every entry's proof against the bundle root.
    ///
    /// Returns the indices of entries that fail.
    pub fn failing_entries(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !verify_record(&e.record(), &self.root, &e.proof, self.layout))
            .map(|(i, _)| i)
            .collect()
    }

    /// Save the bundle as pretty JSON
    pub fn save_to_file(&self, path: &Path) -> Result<(), ProveError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), entries = self.entries.len(), "saved whitelist artifacts");
        Ok(())
    }

    /// Load a bundle written by [`save_to_file`](Self::save_to_file)
    pub fn load_from_file(path: &Path) -> Result<Self, ProveError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
