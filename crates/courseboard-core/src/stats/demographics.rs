//! Education and gender shares of the known population.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ranking::{is_unknown, Bucket};
use super::percent;
use crate::analytics::{last_updated, EducationCount, GenderCount};

/// Education levels in display order, with their labels.
const EDUCATION_LEVELS: &[(&str, &str)] = &[
    ("doctorate", "Doctorate"),
    ("masters", "Master's"),
    ("bachelors", "Bachelor's"),
    ("associates", "Associate"),
    ("secondary", "Secondary"),
    ("junior_secondary", "Junior Secondary"),
    ("primary", "Primary"),
    ("none", "None"),
    ("other", "Other"),
];

const GENDERS: &[(&str, &str)] = &[("female", "Female"), ("male", "Male"), ("other", "Other")];

/// Counts per category, with the unknown bucket last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub categories: Vec<Bucket>,
    pub total: u64,
    pub known_percent: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

pub fn education_breakdown(records: &[EducationCount], unknown_label: &str) -> Breakdown {
    let entries = records
        .iter()
        .map(|r| (r.education_level.as_deref(), r.count));
    Breakdown {
        last_updated: last_updated(records),
        ..breakdown(entries, EDUCATION_LEVELS, unknown_label)
    }
}

pub fn gender_breakdown(records: &[GenderCount], unknown_label: &str) -> Breakdown {
    let entries = records.iter().map(|r| (r.gender.as_deref(), r.count));
    Breakdown {
        last_updated: last_updated(records),
        ..breakdown(entries, GENDERS, unknown_label)
    }
}

/// Sum counts into the fixed `categories`. Keys outside the list are
/// counted as unknown.
fn breakdown<'a, I>(entries: I, categories: &[(&str, &str)], unknown_label: &str) -> Breakdown
where
    I: IntoIterator<Item = (Option<&'a str>, u64)>,
{
    let mut counts = vec![0u64; categories.len()];
    let mut unknown = 0u64;
    for (key, count) in entries {
        let slot = if is_unknown(key) {
            None
        } else {
            key.and_then(|key| {
                categories
                    .iter()
                    .position(|(k, _)| k.eq_ignore_ascii_case(key.trim()))
            })
        };
        match slot {
            Some(slot) => counts[slot] += count,
            None => {
                if !is_unknown(key) {
                    tracing::debug!(?key, "unrecognized category counted as unknown");
                }
                unknown += count;
            }
        }
    }

    let known: u64 = counts.iter().sum();
    let total = known + unknown;
    let mut buckets: Vec<Bucket> = categories
        .iter()
        .zip(&counts)
        .map(|((key, label), &count)| Bucket {
            key: Some((*key).to_string()),
            label: (*label).to_string(),
            count,
            percent: percent(count, known),
        })
        .collect();
    if unknown > 0 {
        buckets.push(Bucket {
            key: None,
            label: unknown_label.to_string(),
            count: unknown,
            percent: 0.0,
        });
    }

    Breakdown {
        categories: buckets,
        total,
        known_percent: percent(known, total),
        last_updated: None,
    }
}
