//! Sequential access latency.

use super::clock::Clock;
use super::{run_phases, Measurement};
use crate::probe::ProbeMemory;

/// Measure the average latency of reading `arr` in index order.
///
/// Runs `max(repeat, arr.len())` iterations per phase; iteration `i` touches
/// index `i % arr.len()`. `zero` must be a disguised zero (see
/// [`disguised_zero`](super::disguised_zero)).
///
/// `arr` must not be empty.
#[inline(never)]
pub fn measure_sequential_latency<M, C>(repeat: u64, arr: &M, zero: u64, clock: &C) -> Measurement
where
    M: ProbeMemory + ?Sized,
    C: Clock + ?Sized,
{
    run_phases(repeat, arr, zero, clock, |i, _state, len| i % len)
}
