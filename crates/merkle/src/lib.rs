//! Merkle commitments for address allowance whitelists.
//!
//! This crate provides:
//! - `leaf`: canonical `(address, count)` encoding and Keccak-256 leaf hashing
//! - `MerkleTree`: sorted-leaf, sorted-pair tree with root and proof extraction
//! - `verify`: root recomputation from a claimed record and a proof, plus the
//!   verifier-side `Whitelist`
//!
//! Producer and verifier share nothing but the root, so every rule here
//! (field widths, leaf order, pair order, odd-node promotion) is fixed.

pub mod digest;
pub mod error;
pub mod leaf;
pub mod proof;
pub mod tree;
pub mod verify;


pub use digest::{hash_pair, keccak256, Digest, DIGEST_LEN};
pub use error::MerkleError;
pub use leaf::{encode, encode_record, hash_leaf, Identity, LeafLayout, Record, IDENTITY_LEN};
pub use proof::MerkleProof;
pub use tree::MerkleTree;
pub use verify::{verify, verify_hex, verify_record, Whitelist};
