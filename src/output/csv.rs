//! CSV rows.

use crate::sweep::SweepPoint;

/// Column names, in row order.
pub const CSV_HEADER: &str = "size_bytes,random_offset_ns,sequential_offset_ns";

/// Format a point as `size_bytes,random_offset_ns,sequential_offset_ns`.
///
/// Offsets are printed with two fractional digits.
pub fn format_csv_row(point: &SweepPoint) -> String {
    format!(
        "{},{:.2},{:.2}",
        point.size_bytes, point.random_offset_ns, point.sequential_offset_ns
    )
}
