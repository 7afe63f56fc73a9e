//! Proof-of-work hash router
//!
//! Resolves a header's mining algorithm and routes its canonical bytes
//! to the registered digest function. The digest comes back in the byte
//! order used for target comparison: interpret it as a big-endian
//! integer and it must not exceed the target.
//!
//! The router ships digests for sha256d, scrypt, groestl, and skein.
//! Qubit has no pure-Rust implementation here; embedders that validate a
//! chain admitting it must register one, or router construction checks
//! fail. Requesting an unregistered algorithm is a hard
//! `UnsupportedAlgorithm` error, never a fallback to another hash:
//! silently substituting a digest would accept or reject the wrong
//! blocks.

use digest::consts::U32;
use groestl::Groestl512;
use num_bigint::BigUint;
use scrypt::Params as ScryptParams;
use sha2::Digest;
use skein::Skein512;
use std::collections::HashMap;

use crate::consensus::{AlgoId, BlockHeader, ChainParams, DifficultyError, Target};
use crate::crypto::{sha256, Hash};

/// A proof-of-work digest over raw header bytes
pub type PowHashFn = fn(&[u8]) -> [u8; 32];

/// Registry mapping algorithms to their digest functions
#[derive(Debug, Clone)]
pub struct HashRouter {
    table: HashMap<AlgoId, PowHashFn>,
}

impl HashRouter {
    /// Router with the built-in digest functions registered
    pub fn new() -> Self {
        let mut table: HashMap<AlgoId, PowHashFn> = HashMap::new();
        table.insert(AlgoId::Sha256d, sha256d_pow);
        table.insert(AlgoId::Scrypt, scrypt_pow);
        table.insert(AlgoId::Groestl, groestl_pow);
        table.insert(AlgoId::Skein, skein_pow);
        Self { table }
    }

    /// Register (or replace) the digest for an algorithm
    pub fn register(&mut self, algo: AlgoId, hash_fn: PowHashFn) {
        self.table.insert(algo, hash_fn);
    }

    /// Whether a digest is registered for the algorithm
    pub fn supports(&self, algo: AlgoId) -> bool {
        self.table.contains_key(&algo)
    }

    /// Startup-time check that every algorithm a chain admits has a
    /// registered digest
    pub fn ensure_chain_supported(&self, params: &ChainParams) -> Result<(), DifficultyError> {
        for &algo in params.algos() {
            if !self.supports(algo) {
                return Err(DifficultyError::UnsupportedAlgorithm(algo));
            }
        }
        Ok(())
    }

    /// Proof-of-work digest of a header, in target-comparison byte order
    pub fn pow_digest(
        &self,
        params: &ChainParams,
        header: &BlockHeader,
    ) -> Result<Hash, DifficultyError> {
        let algo = params.algo_for_version(header.version);
        let hash_fn = self
            .table
            .get(&algo)
            .ok_or(DifficultyError::UnsupportedAlgorithm(algo))?;
        let mut digest = hash_fn(&header.to_bytes());
        // Digests are produced little-endian; reverse so the big-endian
        // integer reading compares directly against a target.
        digest.reverse();
        Ok(Hash(digest))
    }
}

impl Default for HashRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a PoW digest satisfies a target
pub fn meets_target(digest: &Hash, target: &Target) -> bool {
    BigUint::from_bytes_be(&digest.0) <= *target
}

fn sha256d_pow(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// scrypt(N=1024, r=1, p=1) with the input as its own salt: the classic
/// scrypt_1024_1_1_80 block hash
fn scrypt_pow(data: &[u8]) -> [u8; 32] {
    let params = ScryptParams::new(10, 1, 1, 32).expect("fixed scrypt params are valid");
    let mut out = [0u8; 32];
    scrypt::scrypt(data, data, &params, &mut out).expect("32-byte output is valid");
    out
}

/// Double Grøstl-512 truncated to 32 bytes
fn groestl_pow(data: &[u8]) -> [u8; 32] {
    let first = Groestl512::digest(data);
    let second = Groestl512::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second[..32]);
    out
}

/// Skein-512-256 followed by SHA-256
fn skein_pow(data: &[u8]) -> [u8; 32] {
    let inner: [u8; 32] = Skein512::<U32>::digest(data).into();
    sha256(&inner)
}
