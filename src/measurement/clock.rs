//! Nanosecond timestamps for the timed phases.
//!
//! Measurements read time through the [`Clock`] trait so the timing loops can
//! be driven by a fake clock in tests. [`MonotonicClock`] is the production
//! implementation; it counts nanoseconds since the clock was created.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Nanoseconds per second.
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Collapse a `(seconds, nanoseconds)` timestamp into a single nanosecond count.
///
/// Saturates at `u64::MAX`, which is roughly 584 years of uptime.
#[inline]
pub fn timestamp_ns(secs: u64, nanos: u32) -> u64 {
    secs.saturating_mul(NANOS_PER_SEC)
        .saturating_add(u64::from(nanos))
}

/// Nanosecond count of a [`Duration`] measured from an arbitrary epoch.
#[inline]
pub fn duration_ns(d: Duration) -> u64 {
    timestamp_ns(d.as_secs(), d.subsec_nanos())
}

/// Wall-clock nanoseconds since the UNIX epoch.
///
/// Returns 0 if the system clock is set before 1970.
pub fn wall_clock_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(duration_ns)
        .unwrap_or(0)
}

/// Source of nanosecond timestamps.
///
/// Successive calls on the same clock should not go backwards; the
/// measurement routines still clamp negative intervals to zero.
pub trait Clock {
    /// Current time in nanoseconds since the clock's epoch.
    fn now_ns(&self) -> u64;
}

/// Monotonic clock anchored at its creation instant.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_ns(&self) -> u64 {
        duration_ns(self.origin.elapsed())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_ns(&self) -> u64 {
        (**self).now_ns()
    }
}
