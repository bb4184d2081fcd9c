//! Gap filling for sparse chart series.
//!
//! Indexed series (video segments, age bins) are zero-filled; dated series
//! (daily enrollment) carry the previous day's values forward so a missing
//! day does not read as a drop. All fills are idempotent.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A point addressed by a non-negative integer position.
pub trait IndexedPoint: Clone {
    fn index(&self) -> u64;

    /// Zero-valued point for a missing position.
    fn placeholder(index: u64) -> Self;
}

/// A point addressed by calendar day.
pub trait DatedPoint: Clone {
    fn date(&self) -> NaiveDate;

    /// Copy of this point moved to another day.
    fn carried_to(&self, date: NaiveDate) -> Self;
}

/// An indexed point that covers a fixed-width bucket starting at `start()`.
pub trait BucketedPoint: IndexedPoint {
    fn start(&self) -> u64;

    /// Copy of this point's counters placed exactly at `boundary`.
    fn pinned_at(&self, boundary: u64) -> Self;
}

/// Dense series over `0..expected_len`.
///
/// Missing indices get placeholders; points at or beyond `expected_len` are
/// kept. Repeated indices keep their first occurrence. Output is sorted by
/// index.
pub fn fill_index_gaps<T, I>(series: I, expected_len: u64) -> Vec<T>
where
    T: IndexedPoint,
    I: IntoIterator<Item = T>,
{
    let mut by_index: BTreeMap<u64, T> = BTreeMap::new();
    for point in series {
        by_index.entry(point.index()).or_insert(point);
    }
    for index in 0..expected_len {
        by_index
            .entry(index)
            .or_insert_with(|| T::placeholder(index));
    }
    by_index.into_values().collect()
}

/// Contiguous daily series from the first day to `end` (or the last day).
///
/// A missing day repeats the previous day's values. An `end` before the last
/// recorded day does not truncate the series.
pub fn fill_date_gaps<T, I>(series: I, end: Option<NaiveDate>) -> Vec<T>
where
    T: DatedPoint,
    I: IntoIterator<Item = T>,
{
    let mut by_date: BTreeMap<NaiveDate, T> = BTreeMap::new();
    for point in series {
        by_date.entry(point.date()).or_insert(point);
    }

    let (Some(&first), Some(&last)) = (by_date.keys().next(), by_date.keys().next_back()) else {
        return Vec::new();
    };
    let stop = end.map_or(last, |end| end.max(last));

    let mut filled = Vec::with_capacity(by_date.len());
    let mut previous: Option<T> = None;
    for day in first.iter_days().take_while(|day| *day <= stop) {
        let point = match by_date.remove(&day) {
            Some(point) => point,
            None => match &previous {
                Some(prev) => prev.carried_to(day),
                None => continue,
            },
        };
        previous = Some(point.clone());
        filled.push(point);
    }
    filled
}

/// Append a terminal point at `boundary` when it falls strictly inside the
/// last point's bucket, so a chart reaches the item's true end.
///
/// Returns whether a point was added.
pub fn pin_end_boundary<T: BucketedPoint>(series: &mut Vec<T>, boundary: u64, bucket_size: u64) -> bool {
    let Some(last) = series.last() else {
        return false;
    };
    let start = last.start();
    if start < boundary && boundary < start.saturating_add(bucket_size) {
        let pinned = last.pinned_at(boundary);
        series.push(pinned);
        true
    } else {
        false
    }
}
