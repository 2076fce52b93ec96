//! Whitelist record feed.
//!
//! The feed is a JSON array of `{"address": "0x…", "count": 2}` objects.
//! Counts may also be given as decimal strings, which is how most tooling
//! emits `uint64` values that do not fit a JS number.

use std::path::Path;

use serde::{Deserialize, Serialize};
use whitelist_merkle::leaf::{count_from_i128, parse_count};
use whitelist_merkle::{Identity, MerkleError, Record};

use crate::prove::ProveError;

/// Count as it appears in the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountField {
    Number(serde_json::Number),
    Text(String),
}

impl CountField {
    fn resolve(&self) -> Result<u64, MerkleError> {
        match self {
            CountField::Number(n) => {
                if let Some(n) = n.as_u64() {
                    Ok(n)
                } else if let Some(n) = n.as_i64() {
                    count_from_i128(i128::from(n))
                } else {
                    // Out of i64/u64 range or fractional
                    Err(MerkleError::InvalidCount(format!("{n} is not a uint64")))
                }
            }
            CountField::Text(s) => parse_count(s),
        }
    }
}

/// One entry of the feed before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub address: String,
    pub count: CountField,
}

impl RecordEntry {
    pub fn to_record(&self) -> Result<Record, MerkleError> {
        let identity: Identity = self.address.parse()?;
        Ok(Record::new(identity, self.count.resolve()?))
    }
}

/// Parse and validate a JSON feed.
pub fn parse_records(json: &str) -> Result<Vec<Record>, ProveError> {
    let entries: Vec<RecordEntry> = serde_json::from_str(json)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .to_record()
                .map_err(|source| ProveError::InvalidRecord { index, source })
        })
        .collect()
}

/// Load a JSON feed from disk.
pub fn load_records(path: &Path) -> Result<Vec<Record>, ProveError> {
    let json = std::fs::read_to_string(path)?;
    let records = parse_records(&json)?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded record feed");
    Ok(records)
}
