//! Whitelist producer library.
//!
//! This crate provides utilities for:
//! - Loading a JSON record feed
//! - Building the whitelist tree and generating proofs
//! - Exporting the root and per-record proofs as a JSON bundle
//! - Local verification of claims and bundles (for testing)

pub mod artifacts;
pub mod prove;
pub mod records;
pub mod verify;

pub use artifacts::{ArtifactEntry, WhitelistArtifacts};
pub use prove::{ProofWithRecord, ProveError, WhitelistTree};
pub use records::{load_records, parse_records, RecordEntry};
pub use verify::{claim_exit_code, verify_artifacts, verify_claim, Claim, VerifyError};

pub use whitelist_merkle::LeafLayout;

/// Install a `tracing` subscriber for the bins, filtered by `RUST_LOG`.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // Ignore a second install, e.g. when called from tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
