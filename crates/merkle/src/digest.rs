//! 32-byte Keccak-256 digests and the sorted-pair combination rule.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest as _, Keccak256};

use crate::error::MerkleError;

/// Width of every leaf and node in the tree.
pub const DIGEST_LEN: usize = 32;

/// A leaf or internal node hash.
///
/// `Ord` is byte-wise lexicographic. Both leaf sorting and sibling pairing
/// rely on this ordering, so producer and verifier must never disagree on it.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub const fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a digest from raw bytes, rejecting anything that is not 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, MerkleError> {
        let arr: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| {
            MerkleError::MalformedInput(format!(
                "expected {DIGEST_LEN}-byte digest, got {} bytes",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; DIGEST_LEN] {
        self.0
    }

    /// `0x`-prefixed lowercase hex, 66 characters.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

impl FromStr for Digest {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(&decode_hex(s)?)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Decode a hex string with an optional `0x` or `0X` prefix.
pub(crate) fn decode_hex(s: &str) -> Result<Vec<u8>, MerkleError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| MerkleError::InvalidHex(format!("{s:?}: {e}")))
}

/// Keccak-256 of `bytes`.
pub fn keccak256(bytes: &[u8]) -> Digest {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    Digest(hasher.finalize().into())
}

/// Combine two siblings: sort ascending, concatenate, hash.
///
/// Argument order never matters: `hash_pair(a, b) == hash_pair(b, a)`.
pub fn hash_pair(a: &Digest, b: &Digest) -> Digest {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    let mut hasher = Keccak256::new();
    hasher.update(lo.0);
    hasher.update(hi.0);
    Digest(hasher.finalize().into())
}
