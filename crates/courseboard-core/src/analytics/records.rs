//! Flat statistic records returned by the analytics service.
//!
//! Counters and timestamps are decoded leniently: a null, negative or
//! non-numeric counter reads as zero and an unparseable timestamp reads as
//! `None`, so one bad row never discards an otherwise usable response.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Records that carry the pipeline's `created` timestamp.
pub trait Timestamped {
    fn created(&self) -> Option<DateTime<Utc>>;
}

/// Newest `created` across a set of records.
pub fn last_updated<'a, T, I>(records: I) -> Option<DateTime<Utc>>
where
    T: Timestamped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records.into_iter().filter_map(Timestamped::created).max()
}

/// Submission counts for one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStatistic {
    pub module_id: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_submissions: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub correct_submissions: u64,
    #[serde(default)]
    pub part_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

/// Start/end viewer counts for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStatistic {
    /// ID used to request the per-segment timeline.
    #[serde(default)]
    pub pipeline_video_id: String,
    pub encoded_module_id: String,
    /// Video length in seconds when the pipeline knows it.
    #[serde(default, deserialize_with = "lenient_optional_count")]
    pub duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient_optional_count")]
    pub segment_length: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub users_at_start: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub users_at_end: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

/// Viewer counts for one fixed-length segment of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSegmentRecord {
    #[serde(deserialize_with = "lenient_count")]
    pub segment: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub num_users: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub num_views: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

/// Count of one answer value for one problem part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDistributionEntry {
    pub part_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub answer_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub last_response_count: u64,
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub variant: Option<i64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

/// Daily enrollment count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentDay {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

/// Learners per birth year; `None` when learners did not state one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthYearCount {
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

/// Learners per self-reported education level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationCount {
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

/// Learners per self-reported gender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderCount {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

/// Learners per country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCount {
    /// ISO alpha-3 code; `UNKNOWN` or null when geolocation failed.
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

macro_rules! impl_timestamped {
    ($($record:ty),* $(,)?) => {
        $(impl Timestamped for $record {
            fn created(&self) -> Option<DateTime<Utc>> {
                self.created
            }
        })*
    };
}

impl_timestamped!(
    ProblemStatistic,
    VideoStatistic,
    VideoSegmentRecord,
    AnswerDistributionEntry,
    EnrollmentDay,
    BirthYearCount,
    EducationCount,
    GenderCount,
    CountryCount,
);

fn count_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value).unwrap_or(0))
}

fn lenient_optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

/// Accepts RFC 3339 and the pipeline's compact `%Y-%m-%dT%H%M%S` form.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H%M%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => parse_timestamp(&raw),
        _ => None,
    })
}
