//! Proof-of-work algorithm registry
//!
//! Multi-algorithm chains embed the mining algorithm in bits 9-11 of the
//! block version word. Each algorithm carries its own pow limit, derived
//! from `~uint256(0) >> k` with a chain-specific shift.

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::consensus::{CompactTarget, Target};

/// Version-word field selecting the mining algorithm (bits 9-11)
pub const VERSION_ALGO_MASK: u32 = 7 << 9;

const VERSION_SHA256D: u32 = 1 << 9;
const VERSION_GROESTL: u32 = 2 << 9;
const VERSION_SKEIN: u32 = 3 << 9;
const VERSION_QUBIT: u32 = 4 << 9;

/// Supported proof-of-work hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgoId {
    Sha256d,
    Scrypt,
    Groestl,
    Skein,
    Qubit,
}

impl AlgoId {
    /// Every algorithm, in version-pattern order
    pub const ALL: [AlgoId; 5] = [
        AlgoId::Sha256d,
        AlgoId::Scrypt,
        AlgoId::Groestl,
        AlgoId::Skein,
        AlgoId::Qubit,
    ];

    /// Easiest permitted target for this algorithm: `(1 << (256 - k)) - 1`
    pub fn max_target(&self) -> Target {
        let shift: usize = match self {
            AlgoId::Sha256d => 32,
            AlgoId::Scrypt => 20,
            AlgoId::Groestl | AlgoId::Skein => 23,
            AlgoId::Qubit => 22,
        };
        (BigUint::one() << (256 - shift)) - 1u32
    }

    /// Compact encoding of the pow limit
    pub fn pow_limit(&self) -> CompactTarget {
        CompactTarget::from_target(&self.max_target())
    }

    /// Resolve the algorithm from a block version word
    ///
    /// Unrecognized or legacy patterns (including version words that
    /// predate the algorithm field) map to the chain's default algorithm.
    pub fn from_version(version: u32, default: AlgoId) -> AlgoId {
        match version & VERSION_ALGO_MASK {
            VERSION_SHA256D => AlgoId::Sha256d,
            VERSION_GROESTL => AlgoId::Groestl,
            VERSION_SKEIN => AlgoId::Skein,
            VERSION_QUBIT => AlgoId::Qubit,
            _ => default,
        }
    }

    /// Version-word bit pattern announcing this algorithm, if it has one
    pub fn version_pattern(&self) -> Option<u32> {
        match self {
            AlgoId::Sha256d => Some(VERSION_SHA256D),
            AlgoId::Groestl => Some(VERSION_GROESTL),
            AlgoId::Skein => Some(VERSION_SKEIN),
            AlgoId::Qubit => Some(VERSION_QUBIT),
            // Scrypt is the legacy default and has no dedicated pattern
            AlgoId::Scrypt => None,
        }
    }
}

impl fmt::Display for AlgoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgoId::Sha256d => "sha256d",
            AlgoId::Scrypt => "scrypt",
            AlgoId::Groestl => "groestl",
            AlgoId::Skein => "skein",
            AlgoId::Qubit => "qubit",
        };
        write!(f, "{}", name)
    }
}
