//! Canonical leaf encoding for whitelist records.
//!
//! A record is an address-like identity plus an allowance count. The encoding
//! has fixed field widths and no separators, so it is injective and byte-exact
//! with what an on-chain verifier rebuilds from `msg.sender` and the claimed
//! count.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::{decode_hex, keccak256, Digest};
use crate::error::MerkleError;

/// Width of an identity (an EVM address).
pub const IDENTITY_LEN: usize = 20;

/// Width of the big-endian count.
pub const COUNT_LEN: usize = 8;

/// ABI word width; every field is left-padded to this in [`LeafLayout::Abi`].
const WORD_LEN: usize = 32;

/// Declared field widths of the leaf encoding.
///
/// The producer and the verifier must use the same layout, otherwise every
/// proof silently fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafLayout {
    /// `abi.encode(address, uint64)`: two 32-byte words.
    #[default]
    Abi,
    /// `abi.encodePacked(address, uint64)`: 20 + 8 bytes.
    Packed,
}

impl LeafLayout {
    /// Number of bytes [`encode_record`] produces for this layout.
    pub const fn encoded_len(self) -> usize {
        match self {
            LeafLayout::Abi => 2 * WORD_LEN,
            LeafLayout::Packed => IDENTITY_LEN + COUNT_LEN,
        }
    }
}

impl fmt::Display for LeafLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafLayout::Abi => f.write_str("abi"),
            LeafLayout::Packed => f.write_str("packed"),
        }
    }
}

impl FromStr for LeafLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abi" => Ok(LeafLayout::Abi),
            "packed" => Ok(LeafLayout::Packed),
            other => Err(format!("unknown leaf layout {other:?}, expected abi or packed")),
        }
    }
}

/// A 20-byte account identity.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity([u8; IDENTITY_LEN]);

impl Identity {
    pub const fn new(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Fails with `InvalidIdentityWidth` unless `bytes` is exactly 20 long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, MerkleError> {
        let arr: [u8; IDENTITY_LEN] =
            bytes
                .try_into()
                .map_err(|_| MerkleError::InvalidIdentityWidth {
                    expected: IDENTITY_LEN,
                    got: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }
}

impl From<[u8; IDENTITY_LEN]> for Identity {
    fn from(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}

impl FromStr for Identity {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(&decode_hex(s)?)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// One whitelist entry: who, and how many they may claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub identity: Identity,
    pub count: u64,
}

impl Record {
    pub fn new(identity: Identity, count: u64) -> Self {
        Self { identity, count }
    }

    /// Build a record from unchecked inputs.
    pub fn from_raw(identity: &[u8], count: i128) -> Result<Self, MerkleError> {
        Ok(Self {
            identity: Identity::from_slice(identity)?,
            count: count_from_i128(count)?,
        })
    }

    /// Canonical byte encoding under `layout`.
    pub fn encode(&self, layout: LeafLayout) -> Vec<u8> {
        encode_record(self, layout)
    }

    /// The leaf digest committed in the tree.
    pub fn leaf(&self, layout: LeafLayout) -> Digest {
        hash_leaf(&self.encode(layout))
    }
}

/// Narrow a signed count to `u64`.
pub fn count_from_i128(count: i128) -> Result<u64, MerkleError> {
    u64::try_from(count).map_err(|_| {
        MerkleError::InvalidCount(format!("{count} does not fit in an unsigned 64-bit count"))
    })
}

/// Parse a decimal count, e.g. from a JSON string field.
pub fn parse_count(s: &str) -> Result<u64, MerkleError> {
    let value: i128 = s
        .trim()
        .parse()
        .map_err(|_| MerkleError::InvalidCount(format!("{s:?} is not a decimal integer")))?;
    count_from_i128(value)
}

/// Encode an identity and count with the declared field widths.
pub fn encode(identity: &[u8], count: i128, layout: LeafLayout) -> Result<Vec<u8>, MerkleError> {
    Ok(encode_record(&Record::from_raw(identity, count)?, layout))
}

/// Infallible encoding for an already-validated record.
pub fn encode_record(record: &Record, layout: LeafLayout) -> Vec<u8> {
    let mut out = vec![0u8; layout.encoded_len()];
    match layout {
        LeafLayout::Abi => {
            out[WORD_LEN - IDENTITY_LEN..WORD_LEN].copy_from_slice(record.identity.as_bytes());
            out[2 * WORD_LEN - COUNT_LEN..].copy_from_slice(&record.count.to_be_bytes());
        }
        LeafLayout::Packed => {
            out[..IDENTITY_LEN].copy_from_slice(record.identity.as_bytes());
            out[IDENTITY_LEN..].copy_from_slice(&record.count.to_be_bytes());
        }
    }
    out
}

/// Hash encoded record bytes into a leaf.
pub fn hash_leaf(encoded: &[u8]) -> Digest {
    keccak256(encoded)
}
