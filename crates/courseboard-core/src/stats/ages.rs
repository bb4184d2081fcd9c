//! Learner ages derived from birth-year counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::percent;
use crate::analytics::{last_updated, BirthYearCount};
use crate::timeline::{fill_index_gaps, IndexedPoint};

/// Ages at or above this share the last histogram bin.
pub const MAX_BINNED_AGE: u64 = 100;

/// Histogram bin for one age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBin {
    pub age: u64,
    /// `"100+"` for the last bin.
    pub label: String,
    pub count: u64,
    /// Share of learners with a known age.
    pub percent: f64,
}

impl IndexedPoint for AgeBin {
    fn index(&self) -> u64 {
        self.age
    }

    fn placeholder(age: u64) -> Self {
        Self {
            age,
            label: bin_label(age),
            count: 0,
            percent: 0.0,
        }
    }
}

fn bin_label(age: u64) -> String {
    if age >= MAX_BINNED_AGE {
        format!("{MAX_BINNED_AGE}+")
    } else {
        age.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeSummary {
    /// `None` when no learner reported a birth year.
    pub median: Option<f64>,
    pub under_26_percent: f64,
    pub between_26_and_40_percent: f64,
    pub over_40_percent: f64,
    pub known_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBreakdown {
    pub bins: Vec<AgeBin>,
    pub summary: AgeSummary,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Median age of a weighted population given as `(age, count)` pairs.
///
/// Counts are accumulated from the youngest age up until the running total
/// exceeds half the population. When it lands exactly on half, the result
/// is the mean of that age and the next populated one.
pub fn weighted_median(ages: &[(u64, u64)]) -> Option<f64> {
    let mut sorted: Vec<(u64, u64)> = ages.iter().copied().filter(|(_, count)| *count > 0).collect();
    sorted.sort_by_key(|(age, _)| *age);

    let total: u64 = sorted.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return None;
    }

    let mut running = 0u64;
    for (position, (age, count)) in sorted.iter().enumerate() {
        running += count;
        if running * 2 > total {
            return Some(*age as f64);
        }
        if running * 2 == total {
            let next = sorted.get(position + 1).map_or(*age, |(next, _)| *next);
            return Some((*age + next) as f64 / 2.0);
        }
    }
    None
}

/// Histogram and summary of learner ages as of `current_year`.
///
/// Missing birth years, and birth years after `current_year`, count as
/// unknown and are left out of every share except `known_percent`.
pub fn age_breakdown(records: &[BirthYearCount], current_year: i32) -> AgeBreakdown {
    let mut ages: Vec<(u64, u64)> = Vec::new();
    let mut unknown = 0u64;
    for record in records {
        match record.birth_year.map(|year| i64::from(current_year) - i64::from(year)) {
            Some(age) if age >= 0 => ages.push((age as u64, record.count)),
            Some(age) => {
                tracing::warn!(birth_year = ?record.birth_year, age, "birth year in the future");
                unknown += record.count;
            }
            None => unknown += record.count,
        }
    }

    let known: u64 = ages.iter().map(|(_, count)| count).sum();
    let total = known + unknown;

    let mut binned = vec![0u64; MAX_BINNED_AGE as usize + 1];
    for (age, count) in &ages {
        binned[(*age).min(MAX_BINNED_AGE) as usize] += count;
    }
    let populated = binned
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(age, &count)| AgeBin {
            age: age as u64,
            label: bin_label(age as u64),
            count,
            percent: percent(count, known),
        });
    let bins = fill_index_gaps(populated, MAX_BINNED_AGE + 1);

    let share = |range: std::ops::RangeInclusive<u64>| {
        let count: u64 = ages
            .iter()
            .filter(|(age, _)| range.contains(age))
            .map(|(_, count)| count)
            .sum();
        percent(count, known)
    };

    AgeBreakdown {
        bins,
        summary: AgeSummary {
            median: weighted_median(&ages),
            under_26_percent: share(0..=25),
            between_26_and_40_percent: share(26..=40),
            over_40_percent: share(41..=u64::MAX),
            known_percent: percent(known, total),
        },
        last_updated: last_updated(records),
    }
}
