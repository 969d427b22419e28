//! Bit-range extraction and masking.
//!
//! This module provides the primitive bit operations shared by the parser and the
//! decode/diff/compare engines. It provides:
//! 1. **Extraction:** Pulling a contiguous bit range out of a 64-bit value.
//! 2. **Masking:** Building the mask with bits `[bit_low, bit_high]` set.
//!
//! All operations are pure and total: out-of-range bits on the input value are
//! masked away rather than reported as errors.

/// Highest bit index addressable in a 64-bit register value.
pub const MAX_BIT: u32 = 63;

/// Extracts the bit range `[bit_low, bit_high]` from `value`, right-aligned.
///
/// # Arguments
///
/// * `value` - The 64-bit register value.
/// * `bit_high` - Most-significant bit of the range (inclusive, `<= 63`).
/// * `bit_low` - Least-significant bit of the range (inclusive, `<= bit_high`).
///
/// # Returns
///
/// `(value >> bit_low) & ((1 << width) - 1)` where `width = bit_high - bit_low + 1`.
#[inline]
pub const fn extract(value: u64, bit_high: u32, bit_low: u32) -> u64 {
    debug_assert!(bit_low <= bit_high && bit_high <= MAX_BIT);
    (value >> bit_low) & width_mask(bit_high - bit_low + 1)
}

/// Returns the mask with exactly the bits `[bit_low, bit_high]` set.
///
/// # Arguments
///
/// * `bit_high` - Most-significant bit of the range (inclusive, `<= 63`).
/// * `bit_low` - Least-significant bit of the range (inclusive, `<= bit_high`).
///
/// # Returns
///
/// The 64-bit mask covering the range, e.g. `mask(14, 13) == 0x6000`.
#[inline]
pub const fn mask(bit_high: u32, bit_low: u32) -> u64 {
    debug_assert!(bit_low <= bit_high && bit_high <= MAX_BIT);
    width_mask(bit_high - bit_low + 1) << bit_low
}

/// Mask of `width` low bits; shift-safe for `width == 64`.
#[inline]
const fn width_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}
