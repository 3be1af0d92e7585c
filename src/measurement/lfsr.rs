//! Galois LFSR used to drive the timing loops.
//!
//! The measurement loops need a stream of values that the optimizer cannot
//! predict, without paying for a real RNG inside the timed region. A 64-bit
//! Galois LFSR costs a shift, a mask and an xor per step.
//!
//! Every value folded into the LFSR state is AND-ed with a *disguised zero*:
//! a number that is always 0 at runtime but is derived from a clock read, so
//! the compiler cannot prove the fold is a no-op and delete the loop.

use super::clock::{wall_clock_ns, NANOS_PER_SEC};

/// Feedback taps of the Galois LFSR (bits 63, 62, 60 and 59).
pub const GALOIS_POLYNOMIAL: u64 = (1 << 63) | (1 << 62) | (1 << 60) | (1 << 59);

/// Initial LFSR state for each measurement.
pub const LFSR_SEED: u64 = 12345;

/// Advance the LFSR by one step.
///
/// Shifts right by one and applies the feedback taps when the bit shifted out
/// was set. The tap is selected by masking rather than branching.
#[inline(always)]
pub fn lfsr_step(state: u64) -> u64 {
    (state >> 1) ^ (0u64.wrapping_sub(state & 1) & GALOIS_POLYNOMIAL)
}

/// Seed for the second phase of a measurement.
///
/// Mixing the previous state through `zero` keeps the two loops from being
/// merged while still starting from [`LFSR_SEED`].
#[inline(always)]
pub fn reseed(state: u64, zero: u64) -> u64 {
    (state & zero) ^ LFSR_SEED
}

/// Disguised zero derived from a timestamp.
///
/// Any timestamp past one second yields 0; smaller ones are returned as-is.
#[inline]
pub fn disguised_zero_from(timestamp_ns: u64) -> u64 {
    if timestamp_ns > NANOS_PER_SEC {
        0
    } else {
        timestamp_ns
    }
}

/// A zero the optimizer cannot see through.
///
/// Reads the wall clock, which is always past the one-second threshold.
pub fn disguised_zero() -> u64 {
    disguised_zero_from(wall_clock_ns())
}
