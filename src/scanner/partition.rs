//! Splitting a backfill interval across workers.

use crate::error::{ScannerError, ScannerResult};
use std::ops::Range;

/// Split `[start, end)` into `jobs` contiguous ranges of `(end - start) / jobs`
/// heights each; the last range absorbs the remainder.
///
/// When the interval is shorter than `jobs`, a single range covers it.
///
/// # Errors
///
/// Returns [`ScannerError::InvalidRange`] if `start >= end` and
/// [`ScannerError::InvalidJobCount`] if `jobs` is zero.
///
/// # Example
///
/// ```
/// use bridge_swap_scanner::scanner::partition;
///
/// let ranges = partition(0, 10, 3).unwrap();
/// assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
/// ```
pub fn partition(start: u64, end: u64, jobs: u64) -> ScannerResult<Vec<Range<u64>>> {
    if start >= end {
        return Err(ScannerError::InvalidRange { start, end });
    }
    if jobs == 0 {
        return Err(ScannerError::InvalidJobCount);
    }

    let step = (end - start) / jobs;
    if step == 0 {
        return Ok(vec![start..end]);
    }

    let ranges = (0..jobs)
        .map(|i| {
            let from = start + i * step;
            let to = if i + 1 == jobs { end } else { from + step };
            from..to
        })
        .collect();
    Ok(ranges)
}
