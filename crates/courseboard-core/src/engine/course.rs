use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use super::report::{descend, ContentKind, EnrollmentTrend, Hierarchy, Report};
use super::settings::EngineSettings;
use crate::analytics::{
    build_answer_distribution, last_updated, AnswerDistribution, AnswerDistributionEntry,
    BirthYearCount, CountryCount, EducationCount, EnrollmentDay, GenderCount, ProblemStatistic,
    StatisticsIndex, VideoSegmentRecord, VideoStatistic,
};
use crate::cache::{cache_key, Cache, MemoryCache, NoopCache};
use crate::clock::{Clock, SystemClock};
use crate::content::{outline, CourseStructure};
use crate::error::{AnalyticsError, CoreError, Result};
use crate::hierarchy::{
    aggregate, encode_module_id, HierarchyBuilder, HierarchyNode, LeafMetrics, LinkBuilder,
    ModuleProfile, ProblemMetrics, VideoMetrics, ASSIGNMENT_LEVELS,
};
use crate::integrations::{AnalyticsClient, AnalyticsSource, ContentClient, ContentSource};
use crate::stats::{
    age_breakdown, education_breakdown, gender_breakdown, geography, AgeBreakdown, Breakdown,
    Geography,
};
use crate::storage::Config;
use crate::timeline::{build_video_timeline, enrollment_summary, enrollment_trend, VideoTimeline};

/// Course analytics engine.
///
/// Fetches the outline and the relevant statistics (through the cache),
/// then runs the pure filter, merge, aggregate and summary steps. Every call
/// builds its own view models; the engine itself holds no per-request state.
pub struct CourseEngine {
    content: Arc<dyn ContentSource>,
    analytics: Arc<dyn AnalyticsSource>,
    cache: Arc<dyn Cache>,
    clock: Arc<dyn Clock>,
    links: LinkBuilder,
    settings: EngineSettings,
}

impl CourseEngine {
    /// Engine over the given sources with no caching and default settings.
    pub fn new(content: Arc<dyn ContentSource>, analytics: Arc<dyn AnalyticsSource>) -> Self {
        let settings = EngineSettings::default();
        Self {
            content,
            analytics,
            cache: Arc::new(NoopCache),
            clock: Arc::new(SystemClock),
            links: LinkBuilder::new(settings.link_base.clone()),
            settings,
        }
    }

    /// Engine over the HTTP clients described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if either service client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let content = ContentClient::new(&config.content_service)?;
        let analytics = AnalyticsClient::new(&config.analytics_service)?;
        let cache: Arc<dyn Cache> = if config.cache.enabled {
            Arc::new(MemoryCache::new())
        } else {
            Arc::new(NoopCache)
        };
        Ok(Self::new(Arc::new(content), Arc::new(analytics))
            .with_cache(cache)
            .with_settings(EngineSettings::from(config)))
    }

    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.links = LinkBuilder::new(settings.link_base.clone());
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ==================== Section tables ====================

    /// Section → subsection → module table for one content kind.
    pub async fn sections(&self, course_id: &str, kind: ContentKind) -> Result<Report<Hierarchy>> {
        let profile = kind.profile();
        match kind {
            ContentKind::GradedProblems | ContentKind::UngradedProblems => {
                let (structure, records) =
                    tokio::try_join!(self.structure(course_id), self.problem_statistics(course_id))?;
                let forest: Vec<HierarchyNode<ProblemMetrics>> =
                    self.section_forest(course_id, &structure, &profile, &records);
                Ok(Report::new(Hierarchy::Problems(forest), last_updated(&records)))
            }
            ContentKind::Videos => {
                let (structure, records) =
                    tokio::try_join!(self.structure(course_id), self.video_statistics(course_id))?;
                let forest: Vec<HierarchyNode<VideoMetrics>> =
                    self.section_forest(course_id, &structure, &profile, &records);
                Ok(Report::new(Hierarchy::Videos(forest), last_updated(&records)))
            }
        }
    }

    /// Subsection rows of one section.
    pub async fn section(
        &self,
        course_id: &str,
        kind: ContentKind,
        section_id: &str,
    ) -> Result<Report<Hierarchy>> {
        let report = self.sections(course_id, kind).await?;
        let data = report.data.descend(&[("section", section_id)])?;
        Ok(Report::new(data, report.last_updated))
    }

    /// Module rows of one subsection.
    pub async fn subsection(
        &self,
        course_id: &str,
        kind: ContentKind,
        section_id: &str,
        subsection_id: &str,
    ) -> Result<Report<Hierarchy>> {
        let report = self.sections(course_id, kind).await?;
        let data = report
            .data
            .descend(&[("section", section_id), ("subsection", subsection_id)])?;
        Ok(Report::new(data, report.last_updated))
    }

    // ==================== Assignments ====================

    /// Graded assignments (optionally of one type) with their problems.
    pub async fn assignments(
        &self,
        course_id: &str,
        assignment_type: Option<&str>,
    ) -> Result<Report<Vec<HierarchyNode<ProblemMetrics>>>> {
        let (structure, records) =
            tokio::try_join!(self.structure(course_id), self.problem_statistics(course_id))?;
        let profile = ModuleProfile::graded_problems();
        let index = StatisticsIndex::build(&records);
        let mut forest: Vec<HierarchyNode<ProblemMetrics>> =
            HierarchyBuilder::new(&structure, &profile).assignments(assignment_type, &index);
        aggregate(&mut forest, &|path: &[&str]| {
            self.links
                .build(course_id, profile.area, profile.route, &ASSIGNMENT_LEVELS, path)
        });
        tracing::debug!(
            course_id,
            ?assignment_type,
            assignments = forest.len(),
            "built assignment table"
        );
        Ok(Report::new(forest, last_updated(&records)))
    }

    /// Problem rows of one assignment.
    pub async fn assignment(
        &self,
        course_id: &str,
        assignment_id: &str,
    ) -> Result<Report<Vec<HierarchyNode<ProblemMetrics>>>> {
        let report = self.assignments(course_id, None).await?;
        let problems = descend(report.data, &[("assignment", assignment_id)])?;
        Ok(Report::new(problems, report.last_updated))
    }

    /// Distinct assignment types in outline order.
    pub async fn assignment_types(&self, course_id: &str) -> Result<Report<Vec<String>>> {
        let structure = self.structure(course_id).await?;
        Ok(Report::new(outline::assignment_types(&structure), None))
    }

    // ==================== Charts ====================

    /// Dense watch timeline for one video block.
    pub async fn video_timeline(&self, course_id: &str, video_id: &str) -> Result<Report<VideoTimeline>> {
        let videos = self.video_statistics(course_id).await?;
        let encoded = encode_module_id(video_id);
        let video = videos
            .iter()
            .find(|v| v.encoded_module_id == encoded || v.pipeline_video_id == video_id)
            .ok_or_else(|| AnalyticsError::NoTimeline {
                video_id: video_id.to_string(),
            })?;

        let pipeline_id = video.pipeline_video_id.clone();
        let segments: Vec<VideoSegmentRecord> = self
            .cached("video_timeline", &[pipeline_id.as_str()], async {
                Ok(self.analytics.video_timeline(&pipeline_id).await?)
            })
            .await?;

        let segment_size = video.segment_length.unwrap_or(self.settings.segment_size);
        let timeline = build_video_timeline(&segments, video.duration, segment_size);
        let freshness = timeline.last_updated;
        Ok(Report::new(timeline, freshness))
    }

    pub async fn ages(&self, course_id: &str) -> Result<Report<AgeBreakdown>> {
        let records: Vec<BirthYearCount> = self
            .cached("birth_year", &[course_id], async {
                Ok(self.analytics.birth_years(course_id).await?)
            })
            .await?;
        let breakdown = age_breakdown(&records, self.clock.current_year());
        let freshness = breakdown.last_updated;
        Ok(Report::new(breakdown, freshness))
    }

    pub async fn education(&self, course_id: &str) -> Result<Report<Breakdown>> {
        let records: Vec<EducationCount> = self
            .cached("education", &[course_id], async {
                Ok(self.analytics.education(course_id).await?)
            })
            .await?;
        let breakdown = education_breakdown(&records, &self.settings.unknown_label);
        let freshness = breakdown.last_updated;
        Ok(Report::new(breakdown, freshness))
    }

    pub async fn gender(&self, course_id: &str) -> Result<Report<Breakdown>> {
        let records: Vec<GenderCount> = self
            .cached("gender", &[course_id], async {
                Ok(self.analytics.gender(course_id).await?)
            })
            .await?;
        let breakdown = gender_breakdown(&records, &self.settings.unknown_label);
        let freshness = breakdown.last_updated;
        Ok(Report::new(breakdown, freshness))
    }

    /// Daily enrollment, carried forward across missing days through `end`.
    pub async fn enrollment_trend(
        &self,
        course_id: &str,
        end: Option<NaiveDate>,
    ) -> Result<Report<EnrollmentTrend>> {
        let records: Vec<EnrollmentDay> = self
            .cached("enrollment", &[course_id], async {
                Ok(self.analytics.enrollment(course_id).await?)
            })
            .await?;
        let days = enrollment_trend(&records, end);
        let summary = enrollment_summary(&days);
        Ok(Report::new(
            EnrollmentTrend { days, summary },
            last_updated(&records),
        ))
    }

    pub async fn geography(&self, course_id: &str) -> Result<Report<Geography>> {
        let records: Vec<CountryCount> = self
            .cached("location", &[course_id], async {
                Ok(self.analytics.locations(course_id).await?)
            })
            .await?;
        let geo = geography(&records, self.settings.top_countries, &self.settings.unknown_label);
        let freshness = geo.last_updated;
        Ok(Report::new(geo, freshness))
    }

    /// Answer table for one part of a problem (the first part when `part_id`
    /// is `None`).
    pub async fn answer_distribution(
        &self,
        course_id: &str,
        problem_id: &str,
        part_id: Option<&str>,
    ) -> Result<Report<AnswerDistribution>> {
        let entries: Vec<AnswerDistributionEntry> = self
            .cached("answer_distribution", &[course_id, problem_id], async {
                Ok(self.analytics.answer_distribution(problem_id).await?)
            })
            .await?;
        if entries.is_empty() {
            return Err(AnalyticsError::NoAnswers {
                problem_id: problem_id.to_string(),
            }
            .into());
        }

        let distribution = build_answer_distribution(
            problem_id,
            &entries,
            part_id,
            self.settings.answer_chart_limit,
        )
        .ok_or_else(|| CoreError::NodeNotFound {
            level: "problem part",
            id: part_id.unwrap_or_default().to_string(),
        })?;
        let freshness = distribution.last_updated;
        Ok(Report::new(distribution, freshness))
    }

    // ==================== Fetching ====================

    async fn structure(&self, course_id: &str) -> Result<CourseStructure> {
        self.cached("course_structure", &[course_id], async {
            Ok(self.content.course_structure(course_id).await?)
        })
        .await
    }

    async fn problem_statistics(&self, course_id: &str) -> Result<Vec<ProblemStatistic>> {
        self.cached("problems", &[course_id], async {
            Ok(self.analytics.problems(course_id).await?)
        })
        .await
    }

    async fn video_statistics(&self, course_id: &str) -> Result<Vec<VideoStatistic>> {
        self.cached("videos", &[course_id], async {
            Ok(self.analytics.videos(course_id).await?)
        })
        .await
    }

    /// Serve `fetch` through the cache under `section` + `parts`.
    ///
    /// Entries that no longer decode are dropped and refetched. Errors are
    /// never cached.
    async fn cached<T, F>(&self, section: &str, parts: &[&str], fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T>>,
    {
        let key = cache_key(section, parts);
        if let Some(value) = self.cache.get(&key) {
            match serde_json::from_value(value) {
                Ok(hit) => {
                    tracing::debug!(section, "cache hit");
                    return Ok(hit);
                }
                Err(err) => {
                    tracing::warn!(section, %err, "discarding undecodable cache entry");
                    self.cache.invalidate(&key);
                }
            }
        }

        let fresh = fetch.await?;
        match serde_json::to_value(&fresh) {
            Ok(value) => self.cache.set(&key, value, self.settings.cache_ttl),
            Err(err) => tracing::warn!(section, %err, "response not cacheable"),
        }
        Ok(fresh)
    }

    // ==================== Aggregation ====================

    fn section_forest<M: LeafMetrics>(
        &self,
        course_id: &str,
        structure: &CourseStructure,
        profile: &ModuleProfile,
        records: &[M::Source],
    ) -> Vec<HierarchyNode<M>> {
        let index = StatisticsIndex::build(records);

        let mut forest: Vec<HierarchyNode<M>> =
            HierarchyBuilder::new(structure, profile).sections(&index);
        aggregate(&mut forest, &|path: &[&str]| {
            self.links
                .build(course_id, profile.area, profile.route, &profile.levels, path)
        });
        tracing::info!(
            course_id,
            section = profile.section_key,
            sections = forest.len(),
            "built section table"
        );
        forest
    }
}
