//! Seams between the engine and the two upstream services.

use async_trait::async_trait;

use crate::analytics::{
    AnswerDistributionEntry, BirthYearCount, CountryCount, EducationCount, EnrollmentDay,
    GenderCount, ProblemStatistic, VideoSegmentRecord, VideoStatistic,
};
use crate::content::CourseStructure;
use crate::error::{AnalyticsError, ContentError};

/// Supplies course outlines.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one engine can serve
/// concurrent callers.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn course_structure(&self, course_id: &str) -> Result<CourseStructure, ContentError>;
}

/// Supplies flat learner statistics.
///
/// A resource the service has no data for yet is reported with the matching
/// empty-state variant of [`AnalyticsError`].
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn problems(&self, course_id: &str) -> Result<Vec<ProblemStatistic>, AnalyticsError>;

    async fn videos(&self, course_id: &str) -> Result<Vec<VideoStatistic>, AnalyticsError>;

    async fn video_timeline(
        &self,
        pipeline_video_id: &str,
    ) -> Result<Vec<VideoSegmentRecord>, AnalyticsError>;

    async fn answer_distribution(
        &self,
        problem_id: &str,
    ) -> Result<Vec<AnswerDistributionEntry>, AnalyticsError>;

    async fn enrollment(&self, course_id: &str) -> Result<Vec<EnrollmentDay>, AnalyticsError>;

    async fn birth_years(&self, course_id: &str) -> Result<Vec<BirthYearCount>, AnalyticsError>;

    async fn education(&self, course_id: &str) -> Result<Vec<EducationCount>, AnalyticsError>;

    async fn gender(&self, course_id: &str) -> Result<Vec<GenderCount>, AnalyticsError>;

    async fn locations(&self, course_id: &str) -> Result<Vec<CountryCount>, AnalyticsError>;
}
