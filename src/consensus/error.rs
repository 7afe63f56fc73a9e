//! Error taxonomy of the difficulty engine
//!
//! All three failures are local and synchronous. None of them is ever
//! retried or papered over inside the engine: a silently substituted
//! target or hash function would be a consensus-divergence bug, so every
//! invariant violation surfaces to the caller as a hard error.

use crate::consensus::AlgoId;
use thiserror::Error;

/// Difficulty engine errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyError {
    /// Compact target with an exponent or mantissa outside the legal range
    #[error("invalid compact target encoding: {0:#010x}")]
    InvalidEncoding(u32),

    /// Required historical header absent from both the persistent store
    /// and the reorg buffer. Fatal to the calling validation; the engine
    /// never substitutes a default target.
    #[error("missing header at height {0}")]
    MissingHeader(u64),

    /// The chain declares an algorithm with no registered hash function.
    /// Fatal; never silently mapped to another algorithm.
    #[error("no proof-of-work hash registered for algorithm {0}")]
    UnsupportedAlgorithm(AlgoId),
}
