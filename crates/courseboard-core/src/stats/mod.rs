//! Derived learner statistics.
//!
//! Summaries that are not present in the raw analytics records: the
//! weighted-median age and age histogram, education and gender shares
//! measured against the known population, and top-N country rankings that
//! keep an "unknown" bucket out of the ranking.

mod ages;
mod demographics;
mod ranking;

pub use ages::{age_breakdown, weighted_median, AgeBin, AgeBreakdown, AgeSummary, MAX_BINNED_AGE};
pub use demographics::{education_breakdown, gender_breakdown, Breakdown};
pub use ranking::{geography, is_unknown, rank, Bucket, Geography, Ranking};

/// `100 * part / whole`, or 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// `sum / count`, or 0 when `count` is 0.
pub fn average(sum: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
