//! Daily enrollment trend.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::gap::{fill_date_gaps, DatedPoint};
use crate::analytics::{last_updated, EnrollmentDay};

impl DatedPoint for EnrollmentDay {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn carried_to(&self, date: NaiveDate) -> Self {
        Self {
            date,
            count: self.count,
            created: self.created,
        }
    }
}

/// Headline numbers shown above the trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentSummary {
    pub current_enrollment: u64,
    /// `None` when the trend is shorter than a week.
    pub enrollment_change_last_7_days: Option<i64>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Contiguous daily enrollment through `end`, carrying counts across
/// missing days.
pub fn enrollment_trend(records: &[EnrollmentDay], end: Option<NaiveDate>) -> Vec<EnrollmentDay> {
    fill_date_gaps(records.iter().cloned(), end)
}

/// Summarize a filled trend.
pub fn enrollment_summary(trend: &[EnrollmentDay]) -> EnrollmentSummary {
    let Some(latest) = trend.last() else {
        return EnrollmentSummary {
            current_enrollment: 0,
            enrollment_change_last_7_days: None,
            last_updated: None,
        };
    };

    let week_ago = latest.date - Duration::days(7);
    let change = trend
        .iter()
        .find(|day| day.date == week_ago)
        .map(|day| latest.count as i64 - day.count as i64);

    EnrollmentSummary {
        current_enrollment: latest.count,
        enrollment_change_last_7_days: change,
        last_updated: last_updated(trend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, count: u64) -> EnrollmentDay {
        EnrollmentDay {
            date: NaiveDate::from_ymd_opt(2024, 9, d).unwrap(),
            count,
            created: None,
        }
    }

    #[test]
    fn missing_days_repeat_previous_count() {
        let trend = enrollment_trend(&[day(1, 10), day(4, 13)], None);
        let counts: Vec<_> = trend.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![10, 10, 10, 13]);
        assert_eq!(trend[2].date, NaiveDate::from_ymd_opt(2024, 9, 3).unwrap());
    }

    #[test]
    fn summary_reports_weekly_change() {
        let trend = enrollment_trend(&[day(1, 10), day(5, 20), day(8, 25)], None);
        let summary = enrollment_summary(&trend);
        assert_eq!(summary.current_enrollment, 25);
        assert_eq!(summary.enrollment_change_last_7_days, Some(15));
    }

    #[test]
    fn short_trend_has_no_weekly_change() {
        let trend = enrollment_trend(&[day(1, 10), day(3, 8)], None);
        let summary = enrollment_summary(&trend);
        assert_eq!(summary.current_enrollment, 8);
        assert_eq!(summary.enrollment_change_last_7_days, None);
    }

    #[test]
    fn empty_trend_summary_is_zero() {
        let summary = enrollment_summary(&[]);
        assert_eq!(summary.current_enrollment, 0);
        assert!(summary.last_updated.is_none());
    }
}
