//! Geometric sweep over array sizes.
//!
//! For every size in the progression the runner allocates a fresh probe
//! array, measures random and sequential access on it, hands one
//! [`SweepPoint`] to the caller and drops the array before moving on.
//!
//! Points are delivered as soon as they are measured, so a failure at a
//! later size (allocation or output) leaves every earlier point intact.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::SweepConfig;
use crate::error::{Error, Result};
use crate::measurement::clock::{Clock, MonotonicClock};
use crate::measurement::{disguised_zero, measure_random_latency, measure_sequential_latency};
use crate::probe::{element_count_for, AllocationError, ProbeArray, ProbeMemory};

/// Strictly increasing sequence `s0, ceil(s0 * f), ...` bounded by a maximum.
#[derive(Debug, Clone)]
pub struct SizeProgression {
    next: Option<u64>,
    max: u64,
    factor: f64,
}

impl SizeProgression {
    /// Progression starting at `start`, ending at the last size `<= max`.
    ///
    /// `factor` must be greater than 1; [`SweepConfig`] guarantees this.
    pub fn new(start: u64, max: u64, factor: f64) -> Self {
        Self {
            next: Some(start),
            max,
            factor,
        }
    }
}

/// Size following `current`, or `None` once it no longer fits in a `u64`.
///
/// Falls back to `current + 1` when floating-point rounding fails to grow
/// the size, so the progression always advances.
pub fn next_size(current: u64, factor: f64) -> Option<u64> {
    let scaled = (current as f64 * factor).ceil();
    // u64::MAX as f64 rounds up to 2^64, which is itself out of range.
    if !(scaled < u64::MAX as f64) {
        return None;
    }
    let next = scaled as u64;
    if next <= current {
        warn!(
            "size {} did not grow with factor {}; stepping by one byte",
            current, factor
        );
        return current.checked_add(1);
    }
    Some(next)
}

impl Iterator for SizeProgression {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next?;
        if current > self.max {
            self.next = None;
            return None;
        }
        self.next = next_size(current, self.factor);
        Some(current)
    }
}

/// One output row: offsets measured for a single array size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Array size in bytes.
    pub size_bytes: u64,
    /// Random access latency minus baseline, in nanoseconds.
    pub random_offset_ns: f64,
    /// Sequential access latency minus baseline, in nanoseconds.
    pub sequential_offset_ns: f64,
}

/// Totals of a completed sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepSummary {
    /// Number of points emitted.
    pub points: usize,
    /// XOR of every measurement's terminal LFSR state.
    pub checksum: u64,
}

/// Allocator for probe arrays, given an element count.
pub type Allocator = fn(u64) -> std::result::Result<ProbeArray, AllocationError>;

/// Runs latency sweeps.
#[derive(Debug, Clone)]
pub struct SweepRunner<C = MonotonicClock> {
    clock: C,
    zero: u64,
    allocate: Allocator,
}

impl SweepRunner<MonotonicClock> {
    /// Runner using the monotonic clock and a freshly read disguised zero.
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for SweepRunner<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SweepRunner<C> {
    /// Runner reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            zero: disguised_zero(),
            allocate: ProbeArray::try_new,
        }
    }

    /// Replace the probe array allocator.
    pub fn with_allocator(mut self, allocate: Allocator) -> Self {
        self.allocate = allocate;
        self
    }

    /// Measure a single array size.
    ///
    /// Returns the point and the XOR of both terminal states.
    ///
    /// # Errors
    ///
    /// [`Error::Allocation`] if the probe array cannot be allocated.
    pub fn measure_size(&self, size_bytes: u64, repeat: u64) -> Result<(SweepPoint, u64)> {
        let elements = element_count_for(size_bytes);
        let arr = (self.allocate)(elements).map_err(|e| Error::allocation(size_bytes, e))?;

        let random = measure_random_latency(repeat, &arr, self.zero, &self.clock);
        let sequential = measure_sequential_latency(repeat, &arr, self.zero, &self.clock);
        let len = arr.len();
        drop(arr);

        debug!(
            "size={}B elements={} random: base={:.3}ns access={:.3}ns sequential: base={:.3}ns access={:.3}ns",
            size_bytes,
            len,
            random.baseline_ns,
            random.access_time_ns,
            sequential.baseline_ns,
            sequential.access_time_ns
        );

        let point = SweepPoint {
            size_bytes,
            random_offset_ns: random.offset_ns(),
            sequential_offset_ns: sequential.offset_ns(),
        };
        Ok((point, random.terminal_state ^ sequential.terminal_state))
    }

    /// Sweep every size of `config`, passing each point to `on_point`.
    ///
    /// # Errors
    ///
    /// Stops at the first allocation failure or the first error returned by
    /// `on_point`. Points already delivered are not revoked.
    pub fn run<F>(&self, config: &SweepConfig, mut on_point: F) -> Result<SweepSummary>
    where
        F: FnMut(&SweepPoint) -> Result<()>,
    {
        info!(
            "sweeping sizes up to {} bytes (factor {}, repeat {})",
            config.max_size_bytes(),
            config.factor(),
            config.repeat()
        );

        let mut summary = SweepSummary::default();
        for size_bytes in config.sizes() {
            let (point, state) = self.measure_size(size_bytes, config.repeat())?;
            summary.checksum ^= state;
            summary.points += 1;
            on_point(&point)?;
        }

        info!(
            "sweep finished: {} sizes, checksum {:#018x}",
            summary.points, summary.checksum
        );
        Ok(summary)
    }

    /// Sweep and collect all points.
    pub fn collect(&self, config: &SweepConfig) -> Result<Vec<SweepPoint>> {
        let mut points = Vec::new();
        self.run(config, |p| {
            points.push(*p);
            Ok(())
        })?;
        Ok(points)
    }
}
