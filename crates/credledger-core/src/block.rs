//! Block: an immutable record linking an index, the previous block's hash,
//! a certificate, and a timestamp.
//!
//! The block hash is derived, not stored: it is recomputed on demand from
//! the canonical chaining bytes and is stable once the fields are fixed at
//! construction.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::canonical::canonical_block_bytes;
use crate::certificate::Certificate;
use crate::crypto::ContentHash;
use crate::types::BlockHash;

/// Provenance of a block: which ingestion path produced it.
///
/// Every appended block visibly carries its provenance instead of two
/// same-shaped paths with different safety guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trust {
    /// The embedded certificate's signature verified under the supplied
    /// issuer public key at insertion time.
    Verified,
    /// Appended without a signature check.
    Unverified,
}

impl Trust {
    /// Whether this block went through signature verification.
    pub fn is_verified(self) -> bool {
        matches!(self, Trust::Verified)
    }
}

/// Reference to a block's predecessor.
///
/// The genesis block has no real predecessor and renders as the literal
/// `"0"`; every other block carries the previous block's hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrevHash {
    /// No predecessor (genesis only).
    Genesis,
    /// Hash of the previous block.
    Block(BlockHash),
}

impl PrevHash {
    /// Render as the external hex form: `"0"` for genesis.
    pub fn to_hex(&self) -> String {
        match self {
            PrevHash::Genesis => "0".to_string(),
            PrevHash::Block(h) => h.to_hex(),
        }
    }

    /// Parse the external hex form.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        if s == "0" {
            return Ok(PrevHash::Genesis);
        }
        Ok(PrevHash::Block(BlockHash::from_hex(s)?))
    }
}

impl fmt::Display for PrevHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for PrevHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PrevHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PrevHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A block in the ledger. Immutable after append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain, genesis is 0.
    pub index: u64,

    /// Hash of the previous block, `"0"` for genesis.
    pub prev_hash: PrevHash,

    /// The certificate this block records. Copied in, not shared.
    pub certificate: Certificate,

    /// Creation instant (Unix milliseconds).
    pub timestamp: i64,

    /// Ingestion provenance.
    pub trust: Trust,
}

impl Block {
    /// The genesis block: index 0, no predecessor, placeholder certificate.
    pub fn genesis() -> Self {
        Self::genesis_at(chrono::Utc::now().to_rfc3339(), now_millis())
    }

    /// Genesis block with pinned instants, for deterministic construction.
    pub fn genesis_at(issue_date: impl Into<String>, timestamp: i64) -> Self {
        Self {
            index: 0,
            prev_hash: PrevHash::Genesis,
            certificate: Certificate::genesis(issue_date),
            timestamp,
            trust: Trust::Unverified,
        }
    }

    /// Build the successor of `prev` carrying `certificate`.
    pub fn next(prev: &Block, certificate: Certificate, timestamp: i64, trust: Trust) -> Self {
        Self {
            index: prev.index + 1,
            prev_hash: PrevHash::Block(prev.hash()),
            certificate,
            timestamp,
            trust,
        }
    }

    /// Compute the block hash from the canonical chaining bytes.
    ///
    /// The raw document payload is excluded from the input; only the
    /// content-addressed digests feed the chain.
    pub fn hash(&self) -> BlockHash {
        let bytes = canonical_block_bytes(self);
        BlockHash(ContentHash::hash(&bytes).0)
    }

    /// Whether this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && matches!(self.prev_hash, PrevHash::Genesis)
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
