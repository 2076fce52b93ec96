//! Local proof verification for published artifacts.

use thiserror::Error;
use whitelist_merkle::{verify_hex, LeafLayout, MerkleError};

use crate::artifacts::WhitelistArtifacts;

/// Errors during verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Malformed claim: {0}")]
    Malformed(#[from] MerkleError),
    #[error("{failed} of {total} published proofs do not match the root")]
    InconsistentArtifacts { failed: usize, total: usize },
}

/// A membership claim as it arrives over the wire
#[derive(Debug, Clone)]
pub struct Claim<'a> {
    pub address: &'a str,
    pub count: i128,
    pub proof: &'a [String],
}

/// Verify a hex claim against a hex root.
///
/// `Ok(false)` is a normal "not whitelisted" answer; only malformed widths,
/// hex or counts are errors.
pub fn verify_claim(root: &str, claim: &Claim<'_>, layout: LeafLayout) -> Result<bool, VerifyError> {
    let ok = verify_hex(claim.address, claim.count, root, claim.proof, layout)?;
    tracing::debug!(address = claim.address, count = %claim.count, ok, "verified claim");
    Ok(ok)
}

/// Process exit code for a claim check: 0 when whitelisted, 1 when not,
/// 2 when the claim could not be parsed.
pub fn claim_exit_code(result: &Result<bool, VerifyError>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Verify every entry in a bundle before it is published.
pub fn verify_artifacts(artifacts: &WhitelistArtifacts) -> Result<(), VerifyError> {
    let failed = artifacts.failing_entries();
    if failed.is_empty() {
        return Ok(());
    }
    tracing::warn!(?failed, "artifact bundle has proofs that do not match its root");
    Err(VerifyError::InconsistentArtifacts {
        failed: failed.len(),
        total: artifacts.entries.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prove::WhitelistTree;
    use whitelist_merkle::{Digest, Identity, Record, Whitelist, IDENTITY_LEN};

    fn artifacts() -> WhitelistArtifacts {
        let records = (1..=6u8)
            .map(|i| Record::new(Identity::new([i; IDENTITY_LEN]), 2))
            .collect();
        let whitelist = WhitelistTree::build(records, LeafLayout::Abi).unwrap();
        WhitelistArtifacts::from_tree(&whitelist).unwrap()
    }

    #[test]
    fn test_verify_claim() {
        let artifacts = artifacts();
        let entry = &artifacts.entries[4];
        let address = entry.address.to_string();
        let proof = entry.proof.to_hex();

        let claim = Claim {
            address: &address,
            count: 2,
            proof: &proof,
        };
        assert!(verify_claim(&artifacts.root.to_hex(), &claim, LeafLayout::Abi).unwrap());

        let greedy = Claim { count: 3, ..claim.clone() };
        assert!(!verify_claim(&artifacts.root.to_hex(), &greedy, LeafLayout::Abi).unwrap());

        let empty: Vec<String> = Vec::new();
        let no_proof = Claim { proof: &empty, ..claim };
        assert!(!verify_claim(&artifacts.root.to_hex(), &no_proof, LeafLayout::Abi).unwrap());
    }

    #[test]
    fn test_verify_claim_malformed_root() {
        let artifacts = artifacts();
        let address = artifacts.entries[0].address.to_string();
        let proof = artifacts.entries[0].proof.to_hex();
        let claim = Claim {
            address: &address,
            count: 2,
            proof: &proof,
        };

        assert!(matches!(
            verify_claim("0xdeadbeef", &claim, LeafLayout::Abi),
            Err(VerifyError::Malformed(MerkleError::MalformedInput(_)))
        ));
    }

    #[test]
    fn test_claim_exit_codes() {
        let artifacts = artifacts();
        let root = artifacts.root.to_hex();
        let address = artifacts.entries[1].address.to_string();
        let proof = artifacts.entries[1].proof.to_hex();
        let claim = Claim {
            address: &address,
            count: 2,
            proof: &proof,
        };

        let accepted = verify_claim(&root, &claim, LeafLayout::Abi);
        assert_eq!(claim_exit_code(&accepted), 0);

        let empty: Vec<String> = Vec::new();
        let rejected = verify_claim(&root, &Claim { proof: &empty, ..claim.clone() }, LeafLayout::Abi);
        assert_eq!(claim_exit_code(&rejected), 1);

        let negative = verify_claim(&root, &Claim { count: -1, ..claim.clone() }, LeafLayout::Abi);
        assert_eq!(claim_exit_code(&negative), 2);

        let bad_root = verify_claim("0x1234", &claim, LeafLayout::Abi);
        assert_eq!(claim_exit_code(&bad_root), 2);
    }

    #[test]
    fn test_verify_artifacts() {
        let mut artifacts = artifacts();
        assert!(verify_artifacts(&artifacts).is_ok());

        artifacts.root = Digest::default();
        assert!(matches!(
            verify_artifacts(&artifacts),
            Err(VerifyError::InconsistentArtifacts { failed: 6, total: 6 })
        ));
    }

    #[test]
    fn test_published_root_accepts_every_entry() {
        // A verifier trusts only the root and layout from the bundle
        let artifacts = artifacts();
        let whitelist = Whitelist::new(artifacts.root, artifacts.layout);

        for entry in &artifacts.entries {
            assert!(whitelist.check_in_whitelist(&entry.address, &entry.proof, entry.count));
        }
    }
}
