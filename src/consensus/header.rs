//! Block header structure
//!
//! The engine only reads headers; ownership lives with the header store.

use serde::{Deserialize, Serialize};

use crate::consensus::CompactTarget;
use crate::crypto::Hash;

/// Block header containing all metadata the engine consumes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    /// Protocol version; bits 9-11 select the mining algorithm on
    /// multi-algorithm chains
    pub version: u32,
    /// Hash of the previous block
    pub prev_hash: Hash,
    /// Merkle root of all transactions
    pub merkle_root: Hash,
    /// Block timestamp (seconds since Unix epoch)
    pub timestamp: u64,
    /// Difficulty target in compact form
    pub bits: CompactTarget,
    /// Nonce used for PoW
    pub nonce: u64,
    /// Chain height of this header. Bookkeeping carried alongside the
    /// header; not part of the hashed layout.
    pub height: u64,
}

impl BlockHeader {
    /// Create a new block header
    pub fn new(
        version: u32,
        prev_hash: Hash,
        merkle_root: Hash,
        timestamp: u64,
        bits: CompactTarget,
        nonce: u64,
        height: u64,
    ) -> Self {
        Self {
            version,
            prev_hash,
            merkle_root,
            timestamp,
            bits,
            nonce,
            height,
        }
    }

    /// Serialize the header into its canonical hashing layout
    ///
    /// This is the byte-exact input to every proof-of-work hash; the
    /// height is excluded.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(88);
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&self.prev_hash.0);
        bytes.extend_from_slice(&self.merkle_root.0);
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes.extend_from_slice(&self.bits.0.to_le_bytes());
        bytes.extend_from_slice(&self.nonce.to_le_bytes());
        bytes
    }

    /// Block identity hash (double SHA-256 of the canonical layout)
    pub fn hash(&self) -> Hash {
        crate::crypto::sha256d(&self.to_bytes())
    }

    /// Check if this is the genesis header
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.prev_hash == Hash::zero()
    }
}
