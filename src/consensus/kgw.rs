//! Kimoto Gravity Well retargeting
//!
//! Continuous per-block smoothing for chains that must absorb large,
//! possibly adversarial, hash-rate swings. The well walks backward from
//! the last solved block keeping an online mean of historical targets,
//! and closes the window as soon as the observed block rate leaves a
//! deviation band (the "event horizon") that tightens as more blocks are
//! examined.
//!
//! Numerics: the event horizon term `1 + 0.7084 * (mass/144)^-1.228` is
//! evaluated in IEEE 754 binary64 (`f64::powf`). This is consensus
//! arithmetic: validators on different platforms must compute
//! bit-identical bounds or they can disagree on where the window closes.
//! Everything else in this module is exact integer arithmetic; the mean
//! recurrence divides signed big integers truncating toward zero.

use num_bigint::BigInt;
use num_traits::Zero;

use crate::consensus::retarget::DifficultyEngine;
use crate::consensus::{CompactTarget, DifficultyError, KgwParams, Target};
use crate::storage::HeaderStore;

/// Compute the gravity-well target for the block at `height`
pub(crate) fn gravity_well<S: HeaderStore>(
    engine: &DifficultyEngine<'_, S>,
    height: u64,
    kgw: &KgwParams,
) -> Result<(CompactTarget, Target), DifficultyError> {
    let last_solved_height = height.saturating_sub(1);
    if last_solved_height == 0 || last_solved_height < kgw.past_blocks_min {
        return Ok(engine.pow_limit_pair());
    }

    let last_solved = engine.header_at(last_solved_height)?;

    let mut examined: u64 = 0;
    let mut actual_seconds: i64 = 0;
    let mut target_seconds: i64 = 0;
    let mut average = BigInt::zero();
    let mut reading_height = last_solved_height;

    while examined < kgw.past_blocks_max {
        let reading = engine.header_at(reading_height)?;
        examined += 1;

        let reading_target = BigInt::from(reading.bits.to_target()?);
        if examined == 1 {
            average = reading_target;
        } else {
            // Online mean: recent blocks weigh progressively less. The
            // difference can be negative, hence signed arithmetic.
            average = &average + (reading_target - &average) / BigInt::from(examined);
        }

        // A reading stamped later than the last solved block clamps to
        // zero; it is never treated as a negative work rate.
        actual_seconds =
            (last_solved.timestamp as i64 - reading.timestamp as i64).max(0);
        target_seconds = (kgw.target_spacing * examined) as i64;

        let mut adjustment_ratio = 1.0f64;
        if actual_seconds != 0 && target_seconds != 0 {
            adjustment_ratio = target_seconds as f64 / actual_seconds as f64;
        }

        let event_horizon = 1.0 + 0.7084 * (examined as f64 / 144.0).powf(-1.228);
        let deviation_fast = event_horizon;
        let deviation_slow = 1.0 / event_horizon;

        // Early exit once enough blocks are in: a ratio outside the band
        // means the hash rate has visibly shifted, so the window shrinks
        // instead of averaging the shift away.
        if examined >= kgw.past_blocks_min
            && (adjustment_ratio <= deviation_slow || adjustment_ratio >= deviation_fast)
        {
            break;
        }

        if reading_height == 0 {
            break;
        }
        reading_height -= 1;
    }

    let mut new_target = average;
    if actual_seconds != 0 && target_seconds != 0 {
        new_target = new_target * BigInt::from(actual_seconds) / BigInt::from(target_seconds);
    }

    // The mean of positive targets never goes negative; the guard only
    // keeps the conversion total.
    let new_target = new_target.to_biguint().unwrap_or_default();
    Ok(engine.clamp_and_normalize(new_target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{BlockHeader, ChainParams, DifficultyMode};
    use crate::crypto::Hash;
    use crate::storage::MemoryHeaderStore;

    fn header(height: u64, timestamp: u64, bits: u32) -> BlockHeader {
        BlockHeader::new(
            2,
            Hash::zero(),
            Hash::zero(),
            timestamp,
            CompactTarget(bits),
            0,
            height,
        )
    }

    /// A chain that runs the gravity well from genesis with a small
    /// window, so short synthetic histories exercise the full walk.
    fn kgw_chain(spacing: u64, min: u64, max: u64) -> ChainParams {
        let mut params = ChainParams::multi_algo_chain();
        params.kgw = KgwParams {
            target_spacing: spacing,
            past_blocks_min: min,
            past_blocks_max: max,
        };
        params.schedule = vec![(u64::MAX, DifficultyMode::Kimoto)];
        params
    }

    #[test]
    fn test_short_history_returns_pow_limit() {
        let params = kgw_chain(300, 10, 20);
        let store = MemoryHeaderStore::new();
        let engine = DifficultyEngine::new(&params, &store, &[]);

        // height - 1 below past_blocks_min: no well, pow limit
        for height in [0, 1, 5, 10] {
            let (bits, target) = engine.required_target(height).unwrap();
            assert_eq!(bits, params.pow_limit);
            assert_eq!(target, params.max_target());
        }
    }

    #[test]
    fn test_converged_run_returns_unscaled_average() {
        // Ten blocks, gaps of 100s, spacing parameter 90s: after the full
        // walk actual_seconds == target_seconds == 900, the adjustment
        // ratio is exactly 1.0, and the result is the running average of
        // the (identical) historical targets, unscaled.
        let params = kgw_chain(90, 10, 10);
        let mut store = MemoryHeaderStore::new();
        for h in 0..=10 {
            store.insert(header(h, 100 * h, 0x1e0f_fff0));
        }

        let engine = DifficultyEngine::new(&params, &store, &[]);
        let (bits, target) = engine.required_target(11).unwrap();
        assert_eq!(bits, CompactTarget(0x1e0f_fff0));
        assert_eq!(target, CompactTarget(0x1e0f_fff0).to_target().unwrap());
    }

    #[test]
    fn test_zero_timespan_skips_scaling() {
        // All blocks stamped the same second: actual_seconds stays zero,
        // the ratio keeps its 1.0 default, and the average is returned
        // without scaling.
        let params = kgw_chain(300, 5, 10);
        let mut store = MemoryHeaderStore::new();
        for h in 0..=10 {
            store.insert(header(h, 1_000_000, 0x1e0f_ff00));
        }

        let engine = DifficultyEngine::new(&params, &store, &[]);
        let (bits, _) = engine.required_target(11).unwrap();
        assert_eq!(bits, CompactTarget(0x1e0f_ff00));
    }

    #[test]
    fn test_reversed_timestamps_clamp_to_zero() {
        // Readings stamped later than the last solved block: the signed
        // gap clamps to zero instead of scaling the target negative.
        let params = kgw_chain(300, 5, 10);
        let mut store = MemoryHeaderStore::new();
        for h in 0..=10 {
            store.insert(header(h, 2_000_000 - 100 * h, 0x1e0f_ff00));
        }

        let engine = DifficultyEngine::new(&params, &store, &[]);
        let (bits, _) = engine.required_target(11).unwrap();
        assert_eq!(bits, CompactTarget(0x1e0f_ff00));
    }

    #[test]
    fn test_slow_chain_eases_target() {
        // Blocks 4x slower than the spacing parameter: the final scale by
        // actual/target must ease the target (larger value).
        let params = kgw_chain(100, 5, 10);
        let mut store = MemoryHeaderStore::new();
        for h in 0..=10 {
            store.insert(header(h, 400 * h, 0x1e00_8000));
        }

        let engine = DifficultyEngine::new(&params, &store, &[]);
        let (_, target) = engine.required_target(11).unwrap();
        let previous = CompactTarget(0x1e00_8000).to_target().unwrap();
        assert!(target > previous);
        assert!(target <= params.max_target());
    }

    #[test]
    fn test_fast_chain_tightens_target() {
        let params = kgw_chain(400, 5, 10);
        let mut store = MemoryHeaderStore::new();
        for h in 0..=10 {
            store.insert(header(h, 100 * h, 0x1e00_8000));
        }

        let engine = DifficultyEngine::new(&params, &store, &[]);
        let (_, target) = engine.required_target(11).unwrap();
        let previous = CompactTarget(0x1e00_8000).to_target().unwrap();
        assert!(target < previous);
    }

    #[test]
    fn test_missing_reading_is_fatal() {
        let params = kgw_chain(300, 5, 10);
        let mut store = MemoryHeaderStore::new();
        // Header two below the tip is absent
        for h in 0..=10 {
            if h != 8 {
                store.insert(header(h, 300 * h, 0x1e0f_ff00));
            }
        }

        let engine = DifficultyEngine::new(&params, &store, &[]);
        assert_eq!(
            engine.required_target(10),
            Err(DifficultyError::MissingHeader(8))
        );
    }

    #[test]
    fn test_event_horizon_is_ieee754_binary64() {
        // Pin the deviation band at the minimum window size. Any change
        // in floating-point semantics here shifts where the window
        // closes, which is a consensus break.
        // powf(1.0, y) is exactly 1.0 under IEEE 754
        assert_eq!((144.0f64 / 144.0).powf(-1.228), 1.0);
        let event_horizon = 1.0 + 0.7084f64 * (144.0f64 / 144.0).powf(-1.228);
        assert!((event_horizon - 1.7084).abs() < 1e-15);
        let wide = 1.0 + 0.7084f64 * (1.0f64 / 144.0).powf(-1.228);
        assert!(wide > 300.0);
    }
}
