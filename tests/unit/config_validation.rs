//! Tests for sweep configuration validation.
//!
//! Out-of-range parameters must be rejected before any measurement runs.

use memory_latency::{ConfigError, SweepConfig, MIN_SIZE_BYTES};

// =============================================================================
// MAX SIZE VALIDATION
// =============================================================================

#[test]
fn max_size_below_floor_rejected() {
    assert_eq!(
        SweepConfig::new(50, 2.0, 1000),
        Err(ConfigError::MaxSizeTooSmall { max_size: 50 })
    );
}

#[test]
fn max_size_zero_rejected() {
    assert!(matches!(
        SweepConfig::new(0, 2.0, 1000),
        Err(ConfigError::MaxSizeTooSmall { .. })
    ));
}

#[test]
fn max_size_at_floor_valid() {
    let config = SweepConfig::new(MIN_SIZE_BYTES, 2.0, 1000).unwrap();
    assert_eq!(config.max_size_bytes(), 100);
}

#[test]
fn max_size_large_valid() {
    let config = SweepConfig::new(u64::MAX, 2.0, 1).unwrap();
    assert_eq!(config.max_size_bytes(), u64::MAX);
}

// =============================================================================
// FACTOR VALIDATION
// =============================================================================

#[test]
fn factor_one_rejected() {
    assert_eq!(
        SweepConfig::new(200, 1.0, 1000),
        Err(ConfigError::InvalidFactor { factor: 1.0 })
    );
}

#[test]
fn factor_below_one_rejected() {
    assert!(SweepConfig::new(200, 0.5, 1000).is_err());
    assert!(SweepConfig::new(200, -2.0, 1000).is_err());
}

#[test]
fn factor_non_finite_rejected() {
    assert!(SweepConfig::new(200, f64::NAN, 1000).is_err());
    assert!(SweepConfig::new(200, f64::INFINITY, 1000).is_err());
}

#[test]
fn factor_just_above_one_valid() {
    let config = SweepConfig::new(200, 1.0 + f64::EPSILON, 1000).unwrap();
    assert!(config.factor() > 1.0);
}

// =============================================================================
// REPEAT VALIDATION
// =============================================================================

#[test]
fn repeat_zero_rejected() {
    assert_eq!(SweepConfig::new(200, 2.0, 0), Err(ConfigError::ZeroRepeat));
}

#[test]
fn repeat_one_valid() {
    assert_eq!(SweepConfig::new(200, 2.0, 1).unwrap().repeat(), 1);
}
