//! Learner statistics from the analytics service.
//!
//! This module provides the flat per-leaf records, the merger that joins them
//! onto outline leaves, and the per-problem answer distribution builder.

pub mod answers;
mod merge;
mod records;

pub use answers::{build_answer_distribution, AnswerDistribution, AnswerRow, AnswerType, Question};
pub use merge::{merge, Keyed, StatisticsIndex};
pub use records::{
    last_updated, AnswerDistributionEntry, BirthYearCount, CountryCount, EducationCount,
    EnrollmentDay, GenderCount, ProblemStatistic, Timestamped, VideoSegmentRecord,
    VideoStatistic,
};
