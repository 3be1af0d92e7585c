//! Random access latency.

use super::clock::Clock;
use super::{run_phases, Measurement};
use crate::probe::ProbeMemory;

/// Measure the average latency of reading `arr` in pseudo-random order.
///
/// Same contract as
/// [`measure_sequential_latency`](super::measure_sequential_latency), except
/// the index of each iteration is the current LFSR state modulo
/// `arr.len()`, which defeats spatial locality and hardware prefetching.
#[inline(never)]
pub fn measure_random_latency<M, C>(repeat: u64, arr: &M, zero: u64, clock: &C) -> Measurement
where
    M: ProbeMemory + ?Sized,
    C: Clock + ?Sized,
{
    run_phases(repeat, arr, zero, clock, |_i, state, len| state % len)
}
