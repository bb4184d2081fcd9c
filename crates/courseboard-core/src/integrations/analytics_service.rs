//! Analytics service client: flat learner statistics.
//!
//! Every endpoint returns a JSON array of records. A 404 means the pipeline
//! has nothing for the resource yet and is reported as the matching
//! empty-state error.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::endpoint;
use super::traits::AnalyticsSource;
use crate::analytics::{
    AnswerDistributionEntry, BirthYearCount, CountryCount, EducationCount, EnrollmentDay,
    GenderCount, ProblemStatistic, VideoSegmentRecord, VideoStatistic,
};
use crate::error::AnalyticsError;
use crate::storage::ServiceConfig;

pub struct AnalyticsClient {
    base_url: Url,
    token: String,
    http_client: Client,
}

impl AnalyticsClient {
    /// Build a client from service settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ServiceConfig) -> Result<Self, AnalyticsError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AnalyticsError::Decode(format!("invalid analytics service URL: {e}")))?;
        let http_client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            base_url,
            token: config.token.clone(),
            http_client,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        not_found: impl FnOnce() -> AnalyticsError,
    ) -> Result<Vec<T>, AnalyticsError> {
        let url = endpoint(&self.base_url, segments);
        tracing::debug!(%url, "fetching analytics");

        let mut request = self.http_client.get(url.clone());
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }
        let resp = request.send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(not_found()),
            status if !status.is_success() => Err(AnalyticsError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            _ => {
                let body = resp.text().await?;
                let records: Vec<T> = serde_json::from_str(&body)
                    .map_err(|e| AnalyticsError::Decode(format!("{url}: {e}")))?;
                tracing::debug!(%url, records = records.len(), "analytics fetched");
                Ok(records)
            }
        }
    }

    fn no_enrollment(course_id: &str) -> impl FnOnce() -> AnalyticsError + '_ {
        move || AnalyticsError::NoEnrollment {
            course_id: course_id.to_string(),
        }
    }
}

#[async_trait]
impl AnalyticsSource for AnalyticsClient {
    async fn problems(&self, course_id: &str) -> Result<Vec<ProblemStatistic>, AnalyticsError> {
        self.fetch(&["courses", course_id, "problems"], || AnalyticsError::NoSubmissions {
            course_id: course_id.to_string(),
        })
        .await
    }

    async fn videos(&self, course_id: &str) -> Result<Vec<VideoStatistic>, AnalyticsError> {
        self.fetch(&["courses", course_id, "videos"], || AnalyticsError::NoVideos {
            course_id: course_id.to_string(),
        })
        .await
    }

    async fn video_timeline(
        &self,
        pipeline_video_id: &str,
    ) -> Result<Vec<VideoSegmentRecord>, AnalyticsError> {
        self.fetch(&["videos", pipeline_video_id, "timeline"], || AnalyticsError::NoTimeline {
            video_id: pipeline_video_id.to_string(),
        })
        .await
    }

    async fn answer_distribution(
        &self,
        problem_id: &str,
    ) -> Result<Vec<AnswerDistributionEntry>, AnalyticsError> {
        self.fetch(&["problems", problem_id, "answer_distribution"], || {
            AnalyticsError::NoAnswers {
                problem_id: problem_id.to_string(),
            }
        })
        .await
    }

    async fn enrollment(&self, course_id: &str) -> Result<Vec<EnrollmentDay>, AnalyticsError> {
        self.fetch(&["courses", course_id, "enrollment"], Self::no_enrollment(course_id))
            .await
    }

    async fn birth_years(&self, course_id: &str) -> Result<Vec<BirthYearCount>, AnalyticsError> {
        self.fetch(
            &["courses", course_id, "enrollment", "birth_year"],
            Self::no_enrollment(course_id),
        )
        .await
    }

    async fn education(&self, course_id: &str) -> Result<Vec<EducationCount>, AnalyticsError> {
        self.fetch(
            &["courses", course_id, "enrollment", "education"],
            Self::no_enrollment(course_id),
        )
        .await
    }

    async fn gender(&self, course_id: &str) -> Result<Vec<GenderCount>, AnalyticsError> {
        self.fetch(
            &["courses", course_id, "enrollment", "gender"],
            Self::no_enrollment(course_id),
        )
        .await
    }

    async fn locations(&self, course_id: &str) -> Result<Vec<CountryCount>, AnalyticsError> {
        self.fetch(
            &["courses", course_id, "enrollment", "location"],
            Self::no_enrollment(course_id),
        )
        .await
    }
}
