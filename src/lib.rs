//! Proof-of-work difficulty target engine
//!
//! Converts the 32-bit compact difficulty encoding to and from
//! full-precision 256-bit targets, computes the required target at a
//! given height under the retarget policies a chain schedules (linear,
//! legacy boundary retarget, Kimoto Gravity Well), and routes block
//! headers to the proof-of-work hash function selected by the version
//! word on multi-algorithm chains.
//!
//! The engine is pure: every computation is a deterministic function of
//! the height, the chain parameters, and the header history it is given.
//! Header storage is a collaborator behind the `HeaderStore` trait.

pub mod consensus;
pub mod crypto;
pub mod storage;

/// Chain constants - HARD-CODED, NEVER CONFIGURABLE
pub mod constants {
    /// Scrypt chain: full retarget window in seconds (3.5 days)
    pub const SCRYPT_TARGET_TIMESPAN: u64 = 302_400;

    /// Scrypt chain: target seconds between blocks (2.5 minutes)
    pub const SCRYPT_TARGET_SPACING: u64 = 150;

    /// Scrypt chain: easiest permitted target, compact form
    pub const SCRYPT_POW_LIMIT_BITS: u32 = 0x1e0f_fff0;

    /// Multi-algo chain: legacy retarget window in seconds (8 blocks)
    pub const MULTI_TARGET_TIMESPAN: u64 = 4_800;

    /// Multi-algo chain: target seconds between blocks (10 minutes)
    pub const MULTI_TARGET_SPACING: u64 = 600;

    /// Multi-algo chain: no retargeting below this height
    pub const MULTI_RETARGET_FLOOR: u64 = 135;

    /// Multi-algo chain: last height governed by the legacy retarget
    pub const MULTI_LEGACY_LAST_HEIGHT: u64 = 5_400;

    /// Multi-algo chain: last height governed by the gravity well;
    /// the weighted retarget takes over above this
    pub const MULTI_ALGO_CHANGE_HEIGHT: u64 = 225_000;

    /// Gravity well: target seconds between blocks
    pub const KGW_TARGET_SPACING: u64 = 300;

    /// Gravity well: minimum averaging window (half a day of blocks)
    pub const KGW_PAST_BLOCKS_MIN: u64 = 144;

    /// Gravity well: maximum averaging window (fourteen days of blocks)
    pub const KGW_PAST_BLOCKS_MAX: u64 = 4_032;
}
