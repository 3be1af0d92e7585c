//! Measurement primitives driven through the public API.

use std::cell::{Cell, RefCell};

use memory_latency::measurement::clock::Clock;
use memory_latency::measurement::{effective_repeat, GALOIS_POLYNOMIAL};
use memory_latency::probe::Element;
use memory_latency::{
    measure_random_latency, measure_sequential_latency, AccessPattern, ProbeArray, ProbeMemory,
};

/// Clock that jumps by a different amount on every read.
struct IrregularClock {
    now: Cell<u64>,
    calls: Cell<u64>,
}

impl IrregularClock {
    fn new() -> Self {
        Self {
            now: Cell::new(1_000),
            calls: Cell::new(0),
        }
    }
}

impl Clock for IrregularClock {
    fn now_ns(&self) -> u64 {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        self.now.set(self.now.get() + n * n * 37);
        self.now.get()
    }
}

/// Memory counting reads, without recording indices.
struct CountingMemory {
    data: Vec<Element>,
    reads: Cell<u64>,
    max_index: RefCell<usize>,
}

impl ProbeMemory for CountingMemory {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn load(&self, index: usize) -> Element {
        self.reads.set(self.reads.get() + 1);
        let mut max = self.max_index.borrow_mut();
        *max = (*max).max(index);
        self.data[index]
    }
}

/// Memory recording the order of reads.
struct OrderMemory {
    data: Vec<Element>,
    order: RefCell<Vec<usize>>,
}

impl ProbeMemory for OrderMemory {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn load(&self, index: usize) -> Element {
        self.order.borrow_mut().push(index);
        self.data[index]
    }
}

#[test]
fn timings_nonnegative_with_monotonic_fake_clock() {
    let arr = ProbeArray::try_new(64).unwrap();
    for pattern in [AccessPattern::Random, AccessPattern::Sequential] {
        let clock = IrregularClock::new();
        let m = pattern.measure(1_000, &arr, 0, &clock);
        assert!(
            m.baseline_ns >= 0.0,
            "{pattern:?} baseline {}",
            m.baseline_ns
        );
        assert!(
            m.access_time_ns >= 0.0,
            "{pattern:?} access {}",
            m.access_time_ns
        );
    }
}

#[test]
fn both_patterns_read_exactly_effective_repeat_times() {
    for (repeat, len) in [(0u64, 10usize), (5, 10), (10, 10), (1_000, 10), (3, 1)] {
        for pattern in [AccessPattern::Random, AccessPattern::Sequential] {
            let mem = CountingMemory {
                data: vec![7; len],
                reads: Cell::new(0),
                max_index: RefCell::new(0),
            };
            pattern.measure(repeat, &mem, 0, &IrregularClock::new());
            assert_eq!(mem.reads.get(), effective_repeat(repeat, len as u64));
            assert!(mem.reads.get() >= len as u64);
            assert!(*mem.max_index.borrow() < len);
        }
    }
}

#[test]
fn sequential_touches_every_element() {
    let mem = CountingMemory {
        data: vec![1; 100],
        reads: Cell::new(0),
        max_index: RefCell::new(0),
    };
    measure_sequential_latency(1, &mem, 0, &IrregularClock::new());
    assert_eq!(*mem.max_index.borrow(), 99);
}

#[test]
fn sequential_terminal_state_is_deterministic() {
    let arr = ProbeArray::try_new(5).unwrap();
    let a = measure_sequential_latency(50, &arr, 0, &IrregularClock::new());
    let b = measure_sequential_latency(50, &arr, 0, &IrregularClock::new());
    assert_eq!(a.terminal_state, b.terminal_state);
}

#[test]
fn sequential_order_ignores_zero_value() {
    let expected: Vec<usize> = (0..12).map(|i| i % 5).collect();
    for zero in [0, u64::MAX] {
        let mem = OrderMemory {
            data: (1..=5).collect(),
            order: RefCell::new(Vec::new()),
        };
        measure_sequential_latency(12, &mem, zero, &IrregularClock::new());
        assert_eq!(*mem.order.borrow(), expected, "zero={zero:#x}");
    }
}

#[test]
fn random_and_sequential_share_lfsr_stream_when_zero() {
    // With a true zero nothing from memory reaches the state, so both
    // patterns end at the same LFSR state for the same iteration count.
    let arr = ProbeArray::try_new(32).unwrap();
    let r = measure_random_latency(256, &arr, 0, &IrregularClock::new());
    let s = measure_sequential_latency(256, &arr, 0, &IrregularClock::new());
    assert_eq!(r.terminal_state, s.terminal_state);
}

#[test]
fn polynomial_taps() {
    assert_eq!(GALOIS_POLYNOMIAL.count_ones(), 4);
    assert_eq!(GALOIS_POLYNOMIAL >> 59, 0b11011);
}
