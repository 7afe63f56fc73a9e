//! Compact difficulty target codec
//!
//! The "bits" field of a block header packs a 256-bit target into 32
//! bits: an 8-bit base-256 exponent and a 24-bit mantissa. The mantissa
//! truncation performed by `from_target` is consensus-exact; any rounding
//! deviation here breaks interoperability with the live network.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::consensus::DifficultyError;

/// Full-precision proof-of-work threshold (non-negative, at most 256 bits)
pub type Target = BigUint;

/// 32-bit compact encoding of a difficulty target
///
/// Layout: `exponent << 24 | mantissa`. A normalized encoding has the
/// exponent in `[0x03, 0x1e]` and the mantissa in `[0x8000, 0x7fffff]`;
/// the top mantissa bit stays clear so the value cannot be misread as
/// signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompactTarget(pub u32);

const EXPONENT_MIN: u32 = 0x03;
const EXPONENT_MAX: u32 = 0x1e;
const MANTISSA_MIN: u32 = 0x8000;
const MANTISSA_MAX: u32 = 0x7f_ffff;

impl CompactTarget {
    /// Raw bits value
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Decode the compact form into a full-precision target
    ///
    /// Fails with `InvalidEncoding` when the exponent or mantissa is
    /// outside the legal range.
    pub fn to_target(&self) -> Result<Target, DifficultyError> {
        let exponent = (self.0 >> 24) & 0xff;
        let mantissa = self.0 & 0x00ff_ffff;
        if !(EXPONENT_MIN..=EXPONENT_MAX).contains(&exponent)
            || !(MANTISSA_MIN..=MANTISSA_MAX).contains(&mantissa)
        {
            return Err(DifficultyError::InvalidEncoding(self.0));
        }
        Ok(self.expand())
    }

    /// The value this encoding represents, without range validation.
    ///
    /// Used for chain pow limits whose canonical compact form is fixed by
    /// the chain definition; `to_target` is the validating entry point for
    /// untrusted header bits.
    pub(crate) fn expand(&self) -> Target {
        let exponent = ((self.0 >> 24) & 0xff) as usize;
        let mantissa = self.0 & 0x00ff_ffff;
        BigUint::from(mantissa) << (8 * exponent.saturating_sub(3))
    }

    /// Encode a target into its canonical compact form
    ///
    /// The target is rendered as a minimal big-endian byte string and the
    /// three most significant bytes become the mantissa. When the top
    /// mantissa bit would be set the exponent is bumped and the mantissa
    /// shifted right by one byte, keeping the encoding unsigned.
    pub fn from_target(target: &Target) -> Self {
        let bytes = target.to_bytes_be();
        let (exponent, mantissa) = if bytes.len() < 3 {
            let mut padded = [0u8; 3];
            padded[3 - bytes.len()..].copy_from_slice(&bytes);
            (3u32, mantissa_from(&padded))
        } else {
            (bytes.len() as u32, mantissa_from(&bytes[..3]))
        };

        if mantissa & 0x0080_0000 != 0 {
            CompactTarget((exponent + 1) << 24 | mantissa >> 8)
        } else {
            CompactTarget(exponent << 24 | mantissa)
        }
    }

    /// Encode a target and return the exact value reconstructible from
    /// the produced compact form
    ///
    /// The returned target may be slightly below the input because the
    /// mantissa keeps only the top three bytes. Consensus depends on that
    /// truncation, so callers must store the returned pair, never the
    /// original value.
    pub fn normalize(target: &Target) -> (CompactTarget, Target) {
        let compact = Self::from_target(target);
        let truncated = compact.expand();
        (compact, truncated)
    }
}

impl fmt::Display for CompactTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

fn mantissa_from(bytes: &[u8]) -> u32 {
    u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_bits() {
        let target = CompactTarget(0x1e0f_fff0).to_target().unwrap();
        assert_eq!(target, BigUint::from(0x0f_fff0u32) << 216);
    }

    #[test]
    fn test_decode_rejects_bad_exponent() {
        assert_eq!(
            CompactTarget(0x02_008000).to_target(),
            Err(DifficultyError::InvalidEncoding(0x02_008000))
        );
        assert_eq!(
            CompactTarget(0x1f_008000).to_target(),
            Err(DifficultyError::InvalidEncoding(0x1f_008000))
        );
    }

    #[test]
    fn test_decode_rejects_bad_mantissa() {
        // Below 0x8000: would be ambiguous with a smaller exponent
        assert!(CompactTarget(0x1d00_ffff).to_target().is_err());
        // Top mantissa bit set: reads as negative in the signed form
        assert!(CompactTarget(0x1d80_0000).to_target().is_err());
    }

    #[test]
    fn test_encode_small_target_pads_mantissa() {
        let (compact, truncated) = CompactTarget::normalize(&BigUint::from(0x8000u32));
        assert_eq!(compact, CompactTarget(0x0300_8000));
        assert_eq!(truncated, BigUint::from(0x8000u32));
    }

    #[test]
    fn test_encode_bumps_exponent_on_high_mantissa_bit() {
        // 0xFF8000 << 8: top byte has the sign bit position set
        let target = BigUint::from(0xff_8000u32) << 8;
        let compact = CompactTarget::from_target(&target);
        assert_eq!(compact, CompactTarget(0x0500_ff80));
    }

    #[test]
    fn test_encode_truncates_to_three_bytes() {
        // Four significant bytes: lowest byte is dropped by the mantissa
        let target = BigUint::from(0x1234_5678u32);
        let (compact, truncated) = CompactTarget::normalize(&target);
        assert_eq!(compact, CompactTarget(0x0412_3456));
        assert_eq!(truncated, BigUint::from(0x1234_5600u32));
        assert!(truncated < target);
    }

    #[test]
    fn test_round_trip_valid_bits() {
        for bits in [0x1e0f_fff0u32, 0x1e0f_ffff, 0x1c7f_ffff, 0x0400_8000] {
            let target = CompactTarget(bits).to_target().unwrap();
            assert_eq!(CompactTarget::from_target(&target), CompactTarget(bits));
        }
    }

    #[test]
    fn test_normalize_idempotent() {
        let target = BigUint::parse_bytes(b"123456789abcdef0123456789abcdef0", 16).unwrap();
        let (compact, truncated) = CompactTarget::normalize(&target);
        let (compact2, truncated2) = CompactTarget::normalize(&truncated);
        assert_eq!(compact, compact2);
        assert_eq!(truncated, truncated2);
    }

    #[test]
    fn test_zero_target_encodes_to_zero_mantissa() {
        let (compact, truncated) = CompactTarget::normalize(&BigUint::default());
        assert_eq!(compact, CompactTarget(0x0300_0000));
        assert_eq!(truncated, BigUint::default());
    }
}
