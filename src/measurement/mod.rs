//! Latency measurement primitives.
//!
//! Both primitives run the same two-phase experiment over a probe array:
//!
//! 1. **Baseline**: iterate `repeat` times computing the index and advancing
//!    the LFSR, without touching memory.
//! 2. **Access**: the same loop, but the value folded into the LFSR is read
//!    from the array at the computed index.
//!
//! The per-iteration difference between the two phases is the cost of the
//! load itself; loop overhead, index arithmetic and LFSR work cancel out.
//!
//! The primitives differ only in how they pick the index:
//!
//! | Pattern      | Index                | Locality            |
//! |--------------|----------------------|---------------------|
//! | Sequential   | `i % len`            | monotonic, wrapping |
//! | Random       | `lfsr_state % len`   | none                |
//!
//! Nothing inside a timed phase allocates, logs or performs I/O.

pub mod clock;
pub mod lfsr;
mod random;
mod sequential;

use crate::probe::ProbeMemory;
use clock::Clock;
use lfsr::{lfsr_step, reseed, LFSR_SEED};

pub use clock::{duration_ns, timestamp_ns, MonotonicClock};
pub use lfsr::{disguised_zero, GALOIS_POLYNOMIAL};
pub use random::measure_random_latency;
pub use sequential::measure_sequential_latency;

/// Result of one latency measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Average nanoseconds per iteration without memory access.
    pub baseline_ns: f64,
    /// Average nanoseconds per iteration with memory access.
    pub access_time_ns: f64,
    /// Final LFSR state. Returned so the loops have an observable result.
    pub terminal_state: u64,
}

impl Measurement {
    /// Latency attributable to the memory load: access time minus baseline.
    ///
    /// May be negative for arrays that fit in a single cache line.
    #[inline]
    pub fn offset_ns(&self) -> f64 {
        self.access_time_ns - self.baseline_ns
    }
}

/// Access pattern of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPattern {
    /// Index derived from the LFSR state.
    Random,
    /// Index cycles through the array in order.
    Sequential,
}

impl AccessPattern {
    /// Run the measurement for this pattern.
    pub fn measure<M, C>(self, repeat: u64, arr: &M, zero: u64, clock: &C) -> Measurement
    where
        M: ProbeMemory + ?Sized,
        C: Clock + ?Sized,
    {
        match self {
            AccessPattern::Random => measure_random_latency(repeat, arr, zero, clock),
            AccessPattern::Sequential => measure_sequential_latency(repeat, arr, zero, clock),
        }
    }
}

/// Iteration count actually used: never fewer than the array length, so every
/// element is touched at least once.
#[inline]
pub fn effective_repeat(repeat: u64, arr_len: u64) -> u64 {
    repeat.max(arr_len)
}

/// Shared two-phase timing loop.
///
/// `index_of(i, state, len)` picks the element for iteration `i` given the
/// current LFSR state.
#[inline(always)]
fn run_phases<M, C, F>(repeat: u64, arr: &M, zero: u64, clock: &C, index_of: F) -> Measurement
where
    M: ProbeMemory + ?Sized,
    C: Clock + ?Sized,
    F: Fn(u64, u64, u64) -> u64,
{
    debug_assert!(!arr.is_empty(), "probe array must not be empty");
    let len = arr.len() as u64;
    let repeat = effective_repeat(repeat, len);

    let t0 = clock.now_ns();
    let mut rnd = LFSR_SEED;
    for i in 0..repeat {
        let index = index_of(i, rnd, len);
        rnd ^= index & zero;
        rnd = lfsr_step(rnd);
    }
    let t1 = clock.now_ns();

    let t2 = clock.now_ns();
    rnd = reseed(rnd, zero);
    for i in 0..repeat {
        let index = index_of(i, rnd, len);
        rnd ^= arr.load(index as usize) & zero;
        rnd = lfsr_step(rnd);
    }
    let t3 = clock.now_ns();

    Measurement {
        baseline_ns: t1.saturating_sub(t0) as f64 / repeat as f64,
        access_time_ns: t3.saturating_sub(t2) as f64 / repeat as f64,
        terminal_state: rnd,
    }
}
