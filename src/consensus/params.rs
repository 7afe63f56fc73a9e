//! Per-chain difficulty configuration
//!
//! A single parameter struct replaces per-chain subclassing: each chain
//! supplies its timing constants, pow limit, algorithm handling, and a
//! schedule of retarget policy bands keyed by height.

use serde::{Deserialize, Serialize};

use crate::consensus::{AlgoId, CompactTarget, Target};
use crate::constants::*;

/// Retarget policy active over a height band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyMode {
    /// Classic fixed-window retarget, recomputed every block
    Linear,
    /// Boundary-only retarget with 50/75 clamp ratios and an activation
    /// floor
    Legacy,
    /// Kimoto Gravity Well
    Kimoto,
    /// Multi-algorithm weighted retarget (not yet specified; delegates to
    /// the legacy policy)
    MultiWeighted,
}

/// Kimoto Gravity Well window parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KgwParams {
    /// Target seconds between blocks while the well is active
    pub target_spacing: u64,
    /// Minimum blocks examined before the event horizon can close the
    /// window
    pub past_blocks_min: u64,
    /// Hard ceiling on blocks examined
    pub past_blocks_max: u64,
}

/// Chain-specific difficulty parameters
#[derive(Debug, Clone)]
pub struct ChainParams {
    /// Human-readable chain name
    pub name: &'static str,
    /// Seconds a full linear/legacy retarget window should span
    pub target_timespan: u64,
    /// Target seconds between blocks
    pub target_spacing: u64,
    /// Easiest permitted target, compact form
    pub pow_limit: CompactTarget,
    /// Algorithm assumed when the version word carries no selector
    pub default_algo: AlgoId,
    /// Whether the block version word selects the mining algorithm
    pub multi_algo: bool,
    /// Heights below this always get the pow limit under the legacy
    /// policy
    pub legacy_retarget_floor: u64,
    /// Gravity well window parameters
    pub kgw: KgwParams,
    /// Policy bands as (inclusive upper height, mode); the last band must
    /// cover `u64::MAX`. Bands never revisit an earlier mode.
    pub schedule: Vec<(u64, DifficultyMode)>,
}

impl ChainParams {
    /// Litecoin-style single-algorithm scrypt chain
    pub fn scrypt_chain() -> Self {
        Self {
            name: "scrypt-chain",
            target_timespan: SCRYPT_TARGET_TIMESPAN,
            target_spacing: SCRYPT_TARGET_SPACING,
            pow_limit: CompactTarget(SCRYPT_POW_LIMIT_BITS),
            default_algo: AlgoId::Scrypt,
            multi_algo: false,
            legacy_retarget_floor: 0,
            kgw: KgwParams {
                target_spacing: KGW_TARGET_SPACING,
                past_blocks_min: KGW_PAST_BLOCKS_MIN,
                past_blocks_max: KGW_PAST_BLOCKS_MAX,
            },
            schedule: vec![(u64::MAX, DifficultyMode::Linear)],
        }
    }

    /// Five-algorithm chain with the legacy/gravity-well/weighted fork
    /// schedule
    pub fn multi_algo_chain() -> Self {
        Self {
            name: "multi-algo-chain",
            target_timespan: MULTI_TARGET_TIMESPAN,
            target_spacing: MULTI_TARGET_SPACING,
            pow_limit: AlgoId::Scrypt.pow_limit(),
            default_algo: AlgoId::Scrypt,
            multi_algo: true,
            legacy_retarget_floor: MULTI_RETARGET_FLOOR,
            kgw: KgwParams {
                target_spacing: KGW_TARGET_SPACING,
                past_blocks_min: KGW_PAST_BLOCKS_MIN,
                past_blocks_max: KGW_PAST_BLOCKS_MAX,
            },
            schedule: vec![
                (MULTI_LEGACY_LAST_HEIGHT, DifficultyMode::Legacy),
                (MULTI_ALGO_CHANGE_HEIGHT, DifficultyMode::Kimoto),
                (u64::MAX, DifficultyMode::MultiWeighted),
            ],
        }
    }

    /// Blocks between full recalculations under the linear/legacy policy
    pub fn retarget_interval(&self) -> u64 {
        self.target_timespan / self.target_spacing
    }

    /// Easiest permitted target, full precision
    ///
    /// Always the exact expansion of `pow_limit`, keeping the
    /// compact/full pair consistent.
    pub fn max_target(&self) -> Target {
        self.pow_limit.expand()
    }

    /// Retarget policy active at the given height
    ///
    /// Deterministic and monotone: the schedule never revisits an earlier
    /// mode as height increases.
    pub fn mode_at(&self, height: u64) -> DifficultyMode {
        for &(upper, mode) in &self.schedule {
            if height <= upper {
                return mode;
            }
        }
        self.schedule
            .last()
            .map(|&(_, mode)| mode)
            .unwrap_or(DifficultyMode::Linear)
    }

    /// Algorithm a header with this version word was mined with
    pub fn algo_for_version(&self, version: u32) -> AlgoId {
        if self.multi_algo {
            AlgoId::from_version(version, self.default_algo)
        } else {
            self.default_algo
        }
    }

    /// Algorithms this chain admits
    pub fn algos(&self) -> &[AlgoId] {
        if self.multi_algo {
            &AlgoId::ALL
        } else {
            std::slice::from_ref(&self.default_algo)
        }
    }
}
