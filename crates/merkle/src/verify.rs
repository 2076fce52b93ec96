//! Proof verification against a trusted root.
//!
//! The verifier never sees the leaf set. It rebuilds the leaf from the claimed
//! record, folds the proof with the same sorted-pair rule the tree uses, and
//! compares the result with the root it was given.

use subtle::ConstantTimeEq;

use crate::digest::Digest;
use crate::error::MerkleError;
use crate::leaf::{count_from_i128, Identity, LeafLayout, Record};
use crate::proof::MerkleProof;

/// Verify a typed record. A mismatch is `false`.
pub fn verify_record(
    record: &Record,
    root: &Digest,
    proof: &MerkleProof,
    layout: LeafLayout,
) -> bool {
    let computed = proof.compute_root(record, layout);
    bool::from(computed.as_ref().ct_eq(root.as_ref()))
}

/// Verify raw, unchecked inputs.
///
/// Returns `MalformedInput` only when a width or the count is structurally
/// invalid; any well-formed but wrong combination is `Ok(false)`.
pub fn verify<S: AsRef<[u8]>>(
    identity: &[u8],
    count: i128,
    root: &[u8],
    proof: &[S],
    layout: LeafLayout,
) -> Result<bool, MerkleError> {
    let record = Record::from_raw(identity, count).map_err(MerkleError::into_malformed)?;
    let root = Digest::from_slice(root)?;
    let siblings = proof
        .iter()
        .map(|s| Digest::from_slice(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(verify_record(
        &record,
        &root,
        &MerkleProof::new(siblings),
        layout,
    ))
}

/// Verify wire-format inputs: hex identity, hex root, hex siblings.
pub fn verify_hex<S: AsRef<str>>(
    identity: &str,
    count: i128,
    root: &str,
    proof: &[S],
    layout: LeafLayout,
) -> Result<bool, MerkleError> {
    let identity: Identity = identity.parse().map_err(MerkleError::into_malformed)?;
    let count = count_from_i128(count).map_err(MerkleError::into_malformed)?;
    let root: Digest = root.parse().map_err(MerkleError::into_malformed)?;
    let proof = MerkleProof::from_hex(proof).map_err(MerkleError::into_malformed)?;

    Ok(verify_record(
        &Record::new(identity, count),
        &root,
        &proof,
        layout,
    ))
}

/// Verifier-side whitelist holding the root fixed at deployment.
///
/// The caller identity is supplied by whoever authenticated the request
/// (e.g. the transaction sender); this type does no authentication itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Whitelist {
    root: Digest,
    layout: LeafLayout,
}

impl Whitelist {
    pub fn new(root: Digest, layout: LeafLayout) -> Self {
        Self { root, layout }
    }

    pub fn root(&self) -> Digest {
        self.root
    }

    pub fn layout(&self) -> LeafLayout {
        self.layout
    }

    /// Check that `caller` is whitelisted for exactly `count`.
    pub fn check_in_whitelist(&self, caller: &Identity, proof: &MerkleProof, count: u64) -> bool {
        verify_record(&Record::new(*caller, count), &self.root, proof, self.layout)
    }
}

#[cfg(test)]
mod verify_tests {
    use super::*;
    use crate::leaf::IDENTITY_LEN;
    use crate::tree::MerkleTree;

    fn records() -> Vec<Record> {
        (1..=4u8)
            .map(|i| Record::new(Identity::new([i; IDENTITY_LEN]), 2))
            .collect()
    }

    #[test]
    fn test_verify_record_member() {
        let records = records();
        let tree = MerkleTree::from_records(&records, LeafLayout::Abi).unwrap();

        for record in &records {
            let proof = tree.proof_for_record(record, LeafLayout::Abi).unwrap();
            assert!(verify_record(record, &tree.root(), &proof, LeafLayout::Abi));
            assert!(!verify_record(record, &tree.root(), &proof, LeafLayout::Packed));
        }
    }

    #[test]
    fn test_wrong_count_is_false() {
        let records = records();
        let tree = MerkleTree::from_records(&records, LeafLayout::Abi).unwrap();
        let proof = tree.proof_for_record(&records[0], LeafLayout::Abi).unwrap();

        let inflated = Record::new(records[0].identity, 3);
        assert!(!verify_record(&inflated, &tree.root(), &proof, LeafLayout::Abi));
    }

    #[test]
    fn test_raw_verify() {
        let records = records();
        let tree = MerkleTree::from_records(&records, LeafLayout::Abi).unwrap();
        let proof = tree.proof_for_record(&records[2], LeafLayout::Abi).unwrap();

        let ok = verify(
            records[2].identity.as_bytes(),
            2,
            tree.root().as_bytes(),
            proof.siblings(),
            LeafLayout::Abi,
        )
        .unwrap();
        assert!(ok);

        let mismatch = verify(
            records[1].identity.as_bytes(),
            2,
            tree.root().as_bytes(),
            proof.siblings(),
            LeafLayout::Abi,
        )
        .unwrap();
        assert!(!mismatch);
    }

    #[test]
    fn test_raw_verify_malformed() {
        let root = [0u8; 32];
        let no_proof: &[&[u8]] = &[];

        assert!(matches!(
            verify(&[0u8; 19], 1, &root, no_proof, LeafLayout::Abi),
            Err(MerkleError::MalformedInput(_))
        ));
        assert!(matches!(
            verify(&[0u8; 20], -1, &root, no_proof, LeafLayout::Abi),
            Err(MerkleError::MalformedInput(_))
        ));
        assert!(matches!(
            verify(&[0u8; 20], 1, &root[..31], no_proof, LeafLayout::Abi),
            Err(MerkleError::MalformedInput(_))
        ));

        let short_sibling: &[&[u8]] = &[&[0u8; 33]];
        assert!(matches!(
            verify(&[0u8; 20], 1, &root, short_sibling, LeafLayout::Abi),
            Err(MerkleError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_hex_verify() {
        let records = records();
        let tree = MerkleTree::from_records(&records, LeafLayout::Packed).unwrap();
        let proof = tree.proof_for_record(&records[3], LeafLayout::Packed).unwrap();

        let ok = verify_hex(
            &records[3].identity.to_string(),
            2,
            &tree.root().to_hex(),
            &proof.to_hex(),
            LeafLayout::Packed,
        )
        .unwrap();
        assert!(ok);

        assert!(matches!(
            verify_hex("0xnothex", 2, &tree.root().to_hex(), &proof.to_hex(), LeafLayout::Packed),
            Err(MerkleError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_whitelist_check() {
        let records = records();
        let tree = MerkleTree::from_records(&records, LeafLayout::Abi).unwrap();
        let whitelist = Whitelist::new(tree.root(), LeafLayout::Abi);

        let proof = tree.proof_for_record(&records[0], LeafLayout::Abi).unwrap();
        assert!(whitelist.check_in_whitelist(&records[0].identity, &proof, 2));

        let outsider = Identity::new([0xee; IDENTITY_LEN]);
        assert!(!whitelist.check_in_whitelist(&outsider, &proof, 2));
        assert!(!whitelist.check_in_whitelist(&records[0].identity, &MerkleProof::default(), 2));
    }
}
