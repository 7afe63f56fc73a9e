//! Retarget policy engine
//!
//! Computes the required difficulty target at a height by dispatching on
//! the chain's policy schedule. Every policy reads historical headers
//! from the store (falling back to the caller's reorg buffer), converts
//! through the compact codec, and clamps against the chain's max target.
//!
//! The engine is stateless and never mutates its collaborators, so
//! concurrent computations against a consistent store snapshot are safe
//! without locking.

use crate::consensus::kgw;
use crate::consensus::{
    BlockHeader, ChainParams, CompactTarget, DifficultyError, DifficultyMode, Target,
};
use crate::storage::HeaderStore;

/// Difficulty policy engine for one chain
///
/// Borrows the chain parameters, a header store snapshot, and an ordered
/// buffer of headers not yet committed to the store.
pub struct DifficultyEngine<'a, S: HeaderStore> {
    params: &'a ChainParams,
    store: &'a S,
    reorg_buffer: &'a [BlockHeader],
}

impl<'a, S: HeaderStore> DifficultyEngine<'a, S> {
    /// Create an engine over a store snapshot and reorg buffer
    pub fn new(params: &'a ChainParams, store: &'a S, reorg_buffer: &'a [BlockHeader]) -> Self {
        Self {
            params,
            store,
            reorg_buffer,
        }
    }

    /// Chain parameters this engine computes for
    pub fn params(&self) -> &ChainParams {
        self.params
    }

    /// Compute the required compact target and its exact full-precision
    /// value for the block at `height`
    pub fn required_target(&self, height: u64) -> Result<(CompactTarget, Target), DifficultyError> {
        match self.params.mode_at(height) {
            DifficultyMode::Linear => self.linear_target(height),
            DifficultyMode::Legacy => self.legacy_target(height),
            DifficultyMode::Kimoto => kgw::gravity_well(self, height, &self.params.kgw),
            DifficultyMode::MultiWeighted => self.multi_weighted_target(height),
        }
    }

    /// Classic fixed-window retarget, recomputed every block
    ///
    /// The window always spans a full interval back from the previous
    /// block, so the target drifts continuously rather than stepping at
    /// interval boundaries.
    fn linear_target(&self, height: u64) -> Result<(CompactTarget, Target), DifficultyError> {
        if height == 0 {
            return Ok(self.pow_limit_pair());
        }

        let interval = self.params.retarget_interval();
        let last_height = height - 1;
        let first_height = last_height.saturating_sub(interval);
        let first = self.header_at(first_height)?;
        let last = self.header_at(last_height)?;

        let target = last.bits.to_target()?;
        let timespan = self.params.target_timespan;

        // Clamp to [timespan/4, timespan*4]; dampens oscillation from
        // clock skew or timestamp games. A reversed timestamp pair
        // saturates to zero and hits the lower clamp.
        let actual = last
            .timestamp
            .saturating_sub(first.timestamp)
            .clamp(timespan / 4, timespan * 4);

        let new_target = target * actual / timespan;
        Ok(self.clamp_and_normalize(new_target))
    }

    /// Legacy boundary retarget with 50/75 clamp ratios
    ///
    /// Heights below the activation floor always get the pow limit, and
    /// the target only moves at interval boundaries; off-boundary heights
    /// inherit the previous block's pair unchanged.
    fn legacy_target(&self, height: u64) -> Result<(CompactTarget, Target), DifficultyError> {
        if height == 0 || height < self.params.legacy_retarget_floor {
            return Ok(self.pow_limit_pair());
        }

        let interval = self.params.retarget_interval();
        let last_height = height - 1;
        let last = self.header_at(last_height)?;
        let last_target = last.bits.to_target()?;

        if height % interval != 0 {
            return Ok((last.bits, last_target));
        }

        let first_height = if height == interval {
            0
        } else {
            last_height - interval
        };
        let first = self.header_at(first_height)?;

        let timespan = self.params.target_timespan;
        let actual = last
            .timestamp
            .saturating_sub(first.timestamp)
            .clamp(timespan * 50 / 75, timespan * 75 / 50);

        let new_target = last_target * actual / timespan;
        Ok(self.clamp_and_normalize(new_target))
    }

    /// Multi-algorithm weighted retarget band
    ///
    /// The weighted formula for this band has not been finalized; until
    /// it is, the band deliberately reuses the legacy boundary retarget.
    fn multi_weighted_target(&self, height: u64) -> Result<(CompactTarget, Target), DifficultyError> {
        self.legacy_target(height)
    }

    /// Read a header, preferring the persistent store and falling back to
    /// the reorg buffer
    pub(crate) fn header_at(&self, height: u64) -> Result<BlockHeader, DifficultyError> {
        if let Some(header) = self.store.read_header(height) {
            return Ok(header);
        }
        self.reorg_buffer
            .iter()
            .find(|h| h.height == height)
            .cloned()
            .ok_or(DifficultyError::MissingHeader(height))
    }

    /// The (pow limit, max target) pair every policy returns at genesis
    pub(crate) fn pow_limit_pair(&self) -> (CompactTarget, Target) {
        (self.params.pow_limit, self.params.max_target())
    }

    /// Clamp a computed target to the chain's max and normalize it into a
    /// consistent compact/full pair
    pub(crate) fn clamp_and_normalize(&self, target: Target) -> (CompactTarget, Target) {
        let max = self.params.max_target();
        let clamped = if target > max { max } else { target };
        CompactTarget::normalize(&clamped)
    }
}
