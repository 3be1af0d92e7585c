//! # memory-latency
//!
//! Measure memory access latency as a function of array size.
//!
//! For each array size in a geometric progression the sweep measures two
//! access patterns over a freshly allocated array:
//! - **Random**: indices drawn from a Galois LFSR, no spatial locality
//! - **Sequential**: indices in order, wrapping at the end of the array
//!
//! Each measurement times a baseline loop (index arithmetic and LFSR only)
//! and the same loop with a memory load; the difference is the latency of the
//! load. Plotted against size, the offsets show a step at every cache level
//! (L1, L2, L3) and at DRAM.
//!
//! ## Keeping the loads alive
//!
//! The loaded value is AND-ed with a *disguised zero*, a value that is 0 at
//! runtime but computed from a clock read, and folded into the LFSR state
//! that the measurement returns. The optimizer can neither prove the load is
//! unused nor constant-fold it away.
//!
//! ## Quick Start
//!
//! ```no_run
//! use memory_latency::{SweepConfig, SweepRunner};
//!
//! let config = SweepConfig::new(64 * 1024 * 1024, 1.5, 1_000_000)?;
//! let runner = SweepRunner::new();
//! runner.run(&config, |point| {
//!     println!(
//!         "{},{:.2},{:.2}",
//!         point.size_bytes, point.random_offset_ns, point.sequential_offset_ns
//!     );
//!     Ok(())
//! })?;
//! # Ok::<(), memory_latency::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;

// Functional modules
pub mod measurement;
pub mod output;
pub mod probe;
pub mod sweep;
pub mod topology;

// Re-exports for public API
pub use config::{quiet_from_env, ConfigError, SweepConfig, MIN_SIZE_BYTES, QUIET_ENV};
pub use error::{Error, Result};
pub use measurement::{
    disguised_zero, measure_random_latency, measure_sequential_latency, AccessPattern, Measurement,
    MonotonicClock,
};
pub use output::{OutputFormat, PointWriter};
pub use probe::{AllocationError, ProbeArray, ProbeMemory, ELEMENT_WIDTH_BYTES};
pub use sweep::{SizeProgression, SweepPoint, SweepRunner, SweepSummary};
