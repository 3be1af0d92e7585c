//! JSON serialization for sweep points.

use crate::sweep::SweepPoint;

/// Serialize a point to a single-line JSON object.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for SweepPoint).
pub fn to_json_line(point: &SweepPoint) -> Result<String, serde_json::Error> {
    serde_json::to_string(point)
}
