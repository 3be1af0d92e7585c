//! Sweep driver behavior.

use std::cell::Cell;

use memory_latency::measurement::clock::Clock;
use memory_latency::{
    AllocationError, Error, ProbeArray, SizeProgression, SweepConfig, SweepPoint, SweepRunner,
};

/// Clock advancing one nanosecond per read.
#[derive(Default)]
struct TickClock(Cell<u64>);

impl Clock for TickClock {
    fn now_ns(&self) -> u64 {
        let t = self.0.get() + 1;
        self.0.set(t);
        t
    }
}

fn expected_sizes(max: u64, factor: f64) -> Vec<u64> {
    let mut sizes = Vec::new();
    let mut s = 100u64;
    while s <= max {
        sizes.push(s);
        s = (s as f64 * factor).ceil() as u64;
    }
    sizes
}

#[test]
fn one_point_per_size() {
    let config = SweepConfig::new(10_000, 1.7, 10).unwrap();
    let runner = SweepRunner::with_clock(TickClock::default());

    let points = runner.collect(&config).unwrap();
    let sizes: Vec<u64> = points.iter().map(|p| p.size_bytes).collect();

    assert_eq!(sizes, expected_sizes(10_000, 1.7));
    assert!(sizes.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn doubling_to_200_gives_two_points() {
    let config = SweepConfig::new(200, 2.0, 1000).unwrap();
    let points = SweepRunner::with_clock(TickClock::default())
        .collect(&config)
        .unwrap();
    let sizes: Vec<u64> = points.iter().map(|p| p.size_bytes).collect();
    assert_eq!(sizes, vec![100, 200]);
}

#[test]
fn config_sizes_match_progression() {
    let config = SweepConfig::new(5_000, 3.0, 1).unwrap();
    let from_config: Vec<u64> = config.sizes().collect();
    let direct: Vec<u64> = SizeProgression::new(100, 5_000, 3.0).collect();
    assert_eq!(from_config, direct);
    assert_eq!(from_config, vec![100, 300, 900, 2700]);
}

#[test]
fn offsets_are_zero_with_equal_phase_durations() {
    // Every phase spans exactly one tick, so access time equals baseline.
    let config = SweepConfig::new(400, 2.0, 100).unwrap();
    let points = SweepRunner::with_clock(TickClock::default())
        .collect(&config)
        .unwrap();
    for p in points {
        assert_eq!(p.random_offset_ns, 0.0);
        assert_eq!(p.sequential_offset_ns, 0.0);
    }
}

#[test]
fn summary_counts_points() {
    let config = SweepConfig::new(1_000, 2.0, 10).unwrap();
    let runner = SweepRunner::with_clock(TickClock::default());
    let mut seen = 0;
    let summary = runner
        .run(&config, |_| {
            seen += 1;
            Ok(())
        })
        .unwrap();
    assert_eq!(summary.points, 4);
    assert_eq!(seen, 4);
}

fn fail_above_50_elements(elements: u64) -> Result<ProbeArray, AllocationError> {
    if elements > 50 {
        Err(AllocationError { elements })
    } else {
        ProbeArray::try_new(elements)
    }
}

#[test]
fn allocation_failure_stops_sweep_and_keeps_earlier_points() {
    // 100, 200, 400 bytes = 12, 25, 50 elements; 800 bytes = 100 elements fails.
    let config = SweepConfig::new(100_000, 2.0, 10).unwrap();
    let runner = SweepRunner::with_clock(TickClock::default());
    let runner = runner.with_allocator(fail_above_50_elements);

    let mut emitted: Vec<SweepPoint> = Vec::new();
    let err = runner
        .run(&config, |p| {
            emitted.push(*p);
            Ok(())
        })
        .unwrap_err();

    let sizes: Vec<u64> = emitted.iter().map(|p| p.size_bytes).collect();
    assert_eq!(sizes, vec![100, 200, 400]);
    match err {
        Error::Allocation { size_bytes, source } => {
            assert_eq!(size_bytes, 800);
            assert_eq!(source.elements, 100);
        }
        other => panic!("expected allocation error, got {other}"),
    }
}

#[test]
fn sink_error_stops_sweep() {
    let config = SweepConfig::new(100_000, 2.0, 10).unwrap();
    let runner = SweepRunner::with_clock(TickClock::default());

    let mut calls = 0;
    let err = runner
        .run(&config, |_| {
            calls += 1;
            if calls == 2 {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into())
            } else {
                Ok(())
            }
        })
        .unwrap_err();

    assert_eq!(calls, 2);
    assert!(matches!(err, Error::Output(_)));
}

#[test]
fn measure_size_uses_one_element_minimum() {
    fn exactly_one(elements: u64) -> Result<ProbeArray, AllocationError> {
        assert_eq!(elements, 1);
        ProbeArray::try_new(elements)
    }
    let runner = SweepRunner::with_clock(TickClock::default()).with_allocator(exactly_one);
    let (point, _) = runner.measure_size(3, 10).unwrap();
    assert_eq!(point.size_bytes, 3);
}
