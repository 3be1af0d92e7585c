//! The array whose access latency is measured.

use std::fmt;

/// Element type of a probe array.
pub type Element = u64;

/// Width of one probe array element in bytes.
pub const ELEMENT_WIDTH_BYTES: u64 = std::mem::size_of::<Element>() as u64;

/// Park–Miller multiplier used to spread the initial element values.
const PARK_MILLER_MULTIPLIER: u64 = 16_807;

/// Park–Miller modulus (2^31 - 1).
const PARK_MILLER_MODULUS: u64 = 2_147_483_647;

/// Memory that the measurement loops load from.
///
/// Implemented for plain slices and [`ProbeArray`]. Tests implement it to
/// observe which indices the loops read.
pub trait ProbeMemory {
    /// Number of elements. Must be at least 1 when measured.
    fn len(&self) -> usize;

    /// Load the element at `index`, which is always `< len()`.
    fn load(&self, index: usize) -> Element;

    /// True when there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProbeMemory for [Element] {
    #[inline(always)]
    fn len(&self) -> usize {
        <[Element]>::len(self)
    }

    #[inline(always)]
    fn load(&self, index: usize) -> Element {
        self[index]
    }
}

/// Number of elements needed to cover `size_bytes`, never less than one.
#[inline]
pub fn element_count_for(size_bytes: u64) -> u64 {
    (size_bytes / ELEMENT_WIDTH_BYTES).max(1)
}

/// Initial value of element `index`.
///
/// Distinct for every index below 2^31 - 1 and never zero.
#[inline]
pub fn initial_value(index: u64) -> Element {
    (index.wrapping_mul(PARK_MILLER_MULTIPLIER) % PARK_MILLER_MODULUS) + 1
}

/// Error returned when a probe array cannot be allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationError {
    /// Number of elements requested.
    pub elements: u64,
}

impl AllocationError {
    /// Bytes that were requested.
    pub fn bytes(&self) -> u64 {
        self.elements.saturating_mul(ELEMENT_WIDTH_BYTES)
    }
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to allocate probe array of {} elements ({} bytes)",
            self.elements,
            self.bytes()
        )
    }
}

impl std::error::Error for AllocationError {}

/// Owned, initialized probe array for one sweep size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeArray {
    elements: Vec<Element>,
}

impl ProbeArray {
    /// Allocate `len` elements (at least one) and fill them with distinct values.
    ///
    /// Allocation goes through `try_reserve_exact`, so running out of memory
    /// is reported instead of aborting the process.
    pub fn try_new(len: u64) -> Result<Self, AllocationError> {
        let len = len.max(1);
        let err = AllocationError { elements: len };
        let count = usize::try_from(len).map_err(|_| err)?;

        let mut elements = Vec::new();
        elements.try_reserve_exact(count).map_err(|_| err)?;
        elements.extend((0..len).map(initial_value));

        Ok(Self { elements })
    }

    /// Allocate the array covering `size_bytes`.
    pub fn for_size(size_bytes: u64) -> Result<Self, AllocationError> {
        Self::try_new(element_count_for(size_bytes))
    }

    /// Elements as a slice.
    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }
}

impl ProbeMemory for ProbeArray {
    #[inline(always)]
    fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline(always)]
    fn load(&self, index: usize) -> Element {
        self.elements[index]
    }
}
