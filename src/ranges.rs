//! Range classification.

use crate::config::StopRange;

/// Returns the first range in declaration order whose bounds admit `temp`,
/// or None when no range does. `max` bounds are inclusive, `min` exclusive.
pub fn classify(temp: f64, ranges: &[StopRange]) -> Option<&StopRange> {
    ranges.iter().find(|r| admits(r, temp))
}

fn admits(range: &StopRange, temp: f64) -> bool {
    match (range.min, range.max) {
        (None, Some(max)) => temp <= max,
        (Some(min), None) => temp > min,
        (Some(min), Some(max)) => min < temp && temp <= max,
        // Rejected at load time; never matches here.
        (None, None) => false,
    }
}
