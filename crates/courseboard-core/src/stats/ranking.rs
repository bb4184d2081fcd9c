//! Top-N rankings with an unknown sentinel bucket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::percent;
use crate::analytics::{last_updated, CountryCount};

/// Country codes the analytics pipeline uses for unresolved locations.
const UNKNOWN_KEYS: &[&str] = &["UNKNOWN", "UNSPECIFIED"];

/// Whether a classifying key denotes an unknown value.
pub fn is_unknown(key: Option<&str>) -> bool {
    match key.map(str::trim) {
        None | Some("") => true,
        Some(key) => UNKNOWN_KEYS.iter().any(|u| u.eq_ignore_ascii_case(key)),
    }
}

/// One labelled count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// `None` for the unknown bucket.
    pub key: Option<String>,
    pub label: String,
    pub count: u64,
    /// Share of the known population; 0 for the unknown bucket.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Known buckets only, largest first, at most N.
    pub top: Vec<Bucket>,
    /// Every known bucket, largest first, then the unknown bucket if any.
    pub all: Vec<Bucket>,
    pub total: u64,
    pub known_percent: f64,
}

/// Rank `(key, label, count)` entries by count.
///
/// Entries whose key is unknown are folded into one bucket labelled
/// `unknown_label`, which never takes a top-N slot. Ties are broken by label.
pub fn rank<I>(entries: I, top_n: usize, unknown_label: &str) -> Ranking
where
    I: IntoIterator<Item = (Option<String>, String, u64)>,
{
    let mut known = Vec::new();
    let mut unknown = 0u64;
    for (key, label, count) in entries {
        if is_unknown(key.as_deref()) {
            unknown += count;
        } else {
            known.push((key, label, count));
        }
    }

    let known_total: u64 = known.iter().map(|(_, _, count)| count).sum();
    let total = known_total + unknown;

    known.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));
    let mut all: Vec<Bucket> = known
        .into_iter()
        .map(|(key, label, count)| Bucket {
            key,
            label,
            count,
            percent: percent(count, known_total),
        })
        .collect();
    let top = all.iter().take(top_n).cloned().collect();

    if unknown > 0 {
        all.push(Bucket {
            key: None,
            label: unknown_label.to_string(),
            count: unknown,
            percent: 0.0,
        });
    }

    Ranking {
        top,
        all,
        total,
        known_percent: percent(known_total, total),
    }
}

/// Enrollment by country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geography {
    pub countries: Ranking,
    /// Distinct known countries.
    pub num_countries: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

pub fn geography(records: &[CountryCount], top_n: usize, unknown_label: &str) -> Geography {
    let entries = records.iter().map(|record| {
        let label = record
            .country_name
            .clone()
            .or_else(|| record.country_code.clone())
            .unwrap_or_default();
        (record.country_code.clone(), label, record.count)
    });
    let countries = rank(entries, top_n, unknown_label);
    let num_countries = countries.all.iter().filter(|b| b.key.is_some()).count();

    Geography {
        countries,
        num_countries,
        last_updated: last_updated(records),
    }
}
