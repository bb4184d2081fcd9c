//! Integration tests for the course engine.
//!
//! Drives every public operation over in-memory sources, from outline and
//! statistics through filtering, merging, aggregation and gap filling.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use courseboard_core::analytics::{
    AnswerDistributionEntry, BirthYearCount, CountryCount, EducationCount, EnrollmentDay,
    GenderCount, VideoSegmentRecord,
};
use courseboard_core::error::{AnalyticsError, ContentError};
use courseboard_core::hierarchy::encode_module_id;
use courseboard_core::{
    AnalyticsSource, ContentKind, ContentSource, CoreError, CourseEngine, CourseStructure,
    FixedClock, MemoryCache, ProblemStatistic, VideoStatistic,
};

const COURSE: &str = "course-v1:edX+DemoX+T1";
const VIDEO: &str = "block-v1:edX+DemoX+T1+type@video+block@intro";

struct FakeContent {
    structure: CourseStructure,
    calls: AtomicUsize,
}

#[async_trait]
impl ContentSource for FakeContent {
    async fn course_structure(&self, course_id: &str) -> Result<CourseStructure, ContentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if course_id == COURSE {
            Ok(self.structure.clone())
        } else {
            Err(ContentError::CourseNotFound {
                course_id: course_id.to_string(),
            })
        }
    }
}

#[derive(Default)]
struct FakeAnalytics {
    problems: Option<Vec<ProblemStatistic>>,
    videos: Option<Vec<VideoStatistic>>,
    timeline: Option<Vec<VideoSegmentRecord>>,
    answers: Option<Vec<AnswerDistributionEntry>>,
    enrollment: Option<Vec<EnrollmentDay>>,
    birth_years: Option<Vec<BirthYearCount>>,
    education: Option<Vec<EducationCount>>,
    gender: Option<Vec<GenderCount>>,
    locations: Option<Vec<CountryCount>>,
}

fn or_empty<T: Clone>(
    data: &Option<Vec<T>>,
    missing: impl FnOnce() -> AnalyticsError,
) -> Result<Vec<T>, AnalyticsError> {
    data.clone().ok_or_else(missing)
}

#[async_trait]
impl AnalyticsSource for FakeAnalytics {
    async fn problems(&self, course_id: &str) -> Result<Vec<ProblemStatistic>, AnalyticsError> {
        or_empty(&self.problems, || AnalyticsError::NoSubmissions {
            course_id: course_id.into(),
        })
    }

    async fn videos(&self, course_id: &str) -> Result<Vec<VideoStatistic>, AnalyticsError> {
        or_empty(&self.videos, || AnalyticsError::NoVideos {
            course_id: course_id.into(),
        })
    }

    async fn video_timeline(&self, id: &str) -> Result<Vec<VideoSegmentRecord>, AnalyticsError> {
        or_empty(&self.timeline, || AnalyticsError::NoTimeline { video_id: id.into() })
    }

    async fn answer_distribution(
        &self,
        problem_id: &str,
    ) -> Result<Vec<AnswerDistributionEntry>, AnalyticsError> {
        or_empty(&self.answers, || AnalyticsError::NoAnswers {
            problem_id: problem_id.into(),
        })
    }

    async fn enrollment(&self, course_id: &str) -> Result<Vec<EnrollmentDay>, AnalyticsError> {
        or_empty(&self.enrollment, || AnalyticsError::NoEnrollment {
            course_id: course_id.into(),
        })
    }

    async fn birth_years(&self, course_id: &str) -> Result<Vec<BirthYearCount>, AnalyticsError> {
        or_empty(&self.birth_years, || AnalyticsError::NoEnrollment {
            course_id: course_id.into(),
        })
    }

    async fn education(&self, course_id: &str) -> Result<Vec<EducationCount>, AnalyticsError> {
        or_empty(&self.education, || AnalyticsError::NoEnrollment {
            course_id: course_id.into(),
        })
    }

    async fn gender(&self, course_id: &str) -> Result<Vec<GenderCount>, AnalyticsError> {
        or_empty(&self.gender, || AnalyticsError::NoEnrollment {
            course_id: course_id.into(),
        })
    }

    async fn locations(&self, course_id: &str) -> Result<Vec<CountryCount>, AnalyticsError> {
        or_empty(&self.locations, || AnalyticsError::NoEnrollment {
            course_id: course_id.into(),
        })
    }
}

/// Week 1 holds a Homework (3 problems) and an Exam (2 problems); Week 2 an
/// ungraded lab with a video.
fn outline() -> CourseStructure {
    CourseStructure::from_value(json!({
        "root": "course",
        "blocks": {
            "course": {"id": "course", "type": "course", "children": ["ch1", "ch2"]},
            "ch1": {"id": "ch1", "type": "chapter", "display_name": "Week 1", "children": ["hw", "exam"]},
            "ch2": {"id": "ch2", "type": "chapter", "display_name": "Week 2", "children": ["lab"]},
            "hw": {"id": "hw", "type": "sequential", "display_name": "Homework 1",
                   "graded": true, "format": "Homework", "children": ["u1"]},
            "exam": {"id": "exam", "type": "sequential", "display_name": "Final",
                     "graded": true, "format": "Exam", "children": ["u2"]},
            "lab": {"id": "lab", "type": "sequential", "display_name": "Lab", "children": ["u3"]},
            "u1": {"id": "u1", "type": "vertical", "children": ["p1", "p2", "p3"]},
            "u2": {"id": "u2", "type": "vertical", "children": ["p4", "p5"]},
            "u3": {"id": "u3", "type": "vertical", "children": [VIDEO, "p6"]},
            "p1": {"id": "p1", "type": "problem", "display_name": "Q1"},
            "p2": {"id": "p2", "type": "problem", "display_name": "Q2"},
            "p3": {"id": "p3", "type": "problem", "display_name": "Q3"},
            "p4": {"id": "p4", "type": "problem", "display_name": "E1"},
            "p5": {"id": "p5", "type": "problem", "display_name": "E2"},
            "p6": {"id": "p6", "type": "problem", "display_name": "Warmup"},
            VIDEO: {"id": VIDEO, "type": "video", "display_name": "Intro"}
        }
    }))
    .unwrap()
}

fn problem(id: &str, total: u64, correct: u64) -> ProblemStatistic {
    ProblemStatistic {
        module_id: id.into(),
        total_submissions: total,
        correct_submissions: correct,
        part_ids: vec![format!("{id}_2_1")],
        created: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
    }
}

fn engine(analytics: FakeAnalytics) -> (CourseEngine, Arc<FakeContent>) {
    let content = Arc::new(FakeContent {
        structure: outline(),
        calls: AtomicUsize::new(0),
    });
    let engine = CourseEngine::new(content.clone(), Arc::new(analytics))
        .with_clock(Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())));
    (engine, content)
}

fn problem_analytics() -> FakeAnalytics {
    FakeAnalytics {
        problems: Some(vec![problem("p1", 6, 5), problem("p2", 4, 2), problem("p6", 3, 3)]),
        ..FakeAnalytics::default()
    }
}

#[tokio::test]
async fn test_assignments_aggregate_submissions_per_type() {
    let (engine, _) = engine(problem_analytics());
    let report = engine.assignments(COURSE, None).await.unwrap();

    assert_eq!(report.data.len(), 2);
    let homework = &report.data[0];
    assert_eq!(homework.id, "hw");
    assert_eq!(homework.index, 1);
    assert_eq!(homework.metrics.total_submissions, 10);
    assert_eq!(homework.metrics.correct_submissions, 7);
    assert_eq!(homework.metrics.correct_percent, 70.0);
    assert_eq!(homework.num_modules, 3);
    assert_eq!(
        homework.url.as_deref(),
        Some("/courses/course-v1%3AedX%2BDemoX%2BT1/performance/graded_content/assignments/hw/")
    );
    assert_eq!(
        homework.children[0].url.as_deref(),
        Some("/courses/course-v1%3AedX%2BDemoX%2BT1/performance/graded_content/assignments/hw/problems/p1/")
    );

    let exam = &report.data[1];
    assert_eq!(exam.index, 2);
    assert_eq!(exam.metrics.total_submissions, 0);
    assert_eq!(exam.metrics.correct_percent, 0.0);
    assert!(exam.url.is_none());
    assert_eq!(exam.children.len(), 2);

    assert_eq!(
        report.last_updated,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn test_assignments_filtered_by_type_and_drilled_into() {
    let (engine, _) = engine(problem_analytics());

    let exams = engine.assignments(COURSE, Some("Exam")).await.unwrap();
    assert_eq!(exams.data.len(), 1);
    assert_eq!(exams.data[0].id, "exam");

    let problems = engine.assignment(COURSE, "hw").await.unwrap();
    let ids: Vec<_> = problems.data.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);

    let types = engine.assignment_types(COURSE).await.unwrap();
    assert_eq!(types.data, vec!["Homework".to_string(), "Exam".to_string()]);
    assert!(types.last_updated.is_none());

    let err = engine.assignment(COURSE, "missing").await.unwrap_err();
    assert!(matches!(err, CoreError::NodeNotFound { level: "assignment", .. }));
}

#[tokio::test]
async fn test_graded_and_ungraded_section_tables() {
    let (engine, _) = engine(problem_analytics());

    let graded = engine.sections(COURSE, ContentKind::GradedProblems).await.unwrap();
    let rows = graded.data.problems().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "ch1");
    assert_eq!(rows[0].metrics.total_submissions, 10);
    assert_eq!(rows[0].num_modules, 5);
    assert_eq!(rows[0].metrics.average_submissions, 2.0);

    let ungraded = engine.sections(COURSE, ContentKind::UngradedProblems).await.unwrap();
    let rows = ungraded.data.problems().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "ch2");
    assert_eq!(
        rows[0].url.as_deref(),
        Some("/courses/course-v1%3AedX%2BDemoX%2BT1/performance/ungraded_content/sections/ch2/")
    );

    let section = engine.section(COURSE, ContentKind::GradedProblems, "ch1").await.unwrap();
    assert_eq!(section.data.len(), 2);

    let subsection = engine
        .subsection(COURSE, ContentKind::GradedProblems, "ch1", "hw")
        .await
        .unwrap();
    assert_eq!(subsection.data.problems().unwrap().len(), 3);
}

#[tokio::test]
async fn test_video_table_and_timeline() {
    let encoded = encode_module_id(VIDEO);
    let analytics = FakeAnalytics {
        videos: Some(vec![VideoStatistic {
            pipeline_video_id: "DemoX|intro".into(),
            encoded_module_id: encoded.clone(),
            duration: Some(22),
            segment_length: Some(5),
            users_at_start: 100,
            users_at_end: 40,
            created: None,
        }]),
        timeline: Some(vec![
            VideoSegmentRecord {
                segment: 0,
                num_users: 100,
                num_views: 120,
                created: None,
            },
            VideoSegmentRecord {
                segment: 4,
                num_users: 40,
                num_views: 45,
                created: None,
            },
        ]),
        ..FakeAnalytics::default()
    };
    let (engine, _) = engine(analytics);

    let report = engine.sections(COURSE, ContentKind::Videos).await.unwrap();
    let sections = report.data.videos().unwrap();
    assert_eq!(sections.len(), 1);
    let lab = &sections[0].children[0];
    assert_eq!(lab.metrics.users_at_start, 100);
    assert_eq!(lab.metrics.end_percent, 40.0);
    assert_eq!(lab.metrics.start_only_users, 60);
    assert_eq!(lab.metrics.start_only_percent, 60.0);
    assert!(lab.children[0]
        .url
        .as_deref()
        .unwrap()
        .ends_with("/engagement/videos/sections/ch2/subsections/lab/modules/block-v1%3AedX%2BDemoX%2BT1%2Btype%40video%2Bblock%40intro/"));

    let timeline = engine.video_timeline(COURSE, VIDEO).await.unwrap().data;
    assert_eq!(timeline.segments.len(), 6);
    let indices: Vec<_> = timeline.segments.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(timeline.segments[0].num_replays, 20);
    assert_eq!(timeline.segments[2].num_users, 0);
    assert_eq!(timeline.segments[5].start_time, 22);
    assert_eq!(timeline.segments[5].num_users, 40);

    let err = engine.video_timeline(COURSE, "unknown-video").await.unwrap_err();
    assert!(err.is_empty_state());
}

#[tokio::test]
async fn test_enrollment_trend_carries_counts_forward() {
    let day = |d: u32, count: u64| EnrollmentDay {
        date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
        count,
        created: None,
    };
    let analytics = FakeAnalytics {
        enrollment: Some(vec![day(1, 10), day(4, 13)]),
        ..FakeAnalytics::default()
    };
    let (engine, _) = engine(analytics);

    let trend = engine.enrollment_trend(COURSE, None).await.unwrap().data;
    let counts: Vec<_> = trend.days.iter().map(|d| d.count).collect();
    assert_eq!(counts, vec![10, 10, 10, 13]);
    assert_eq!(trend.summary.current_enrollment, 13);

    let end = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
    let trend = engine.enrollment_trend(COURSE, Some(end)).await.unwrap().data;
    assert_eq!(trend.days.len(), 8);
    assert_eq!(trend.summary.enrollment_change_last_7_days, Some(3));
}

#[tokio::test]
async fn test_demographics() {
    let analytics = FakeAnalytics {
        birth_years: Some(vec![
            BirthYearCount {
                birth_year: Some(2004),
                count: 1,
                created: None,
            },
            BirthYearCount {
                birth_year: Some(2003),
                count: 1,
                created: None,
            },
            BirthYearCount {
                birth_year: None,
                count: 2,
                created: None,
            },
        ]),
        gender: Some(vec![GenderCount {
            gender: Some("female".into()),
            count: 5,
            created: None,
        }]),
        education: Some(vec![]),
        locations: Some(vec![
            CountryCount {
                country_code: Some("BR".into()),
                country_name: Some("Brazil".into()),
                count: 7,
                created: None,
            },
            CountryCount {
                country_code: None,
                country_name: None,
                count: 3,
                created: None,
            },
        ]),
        ..FakeAnalytics::default()
    };
    let (engine, _) = engine(analytics);

    let ages = engine.ages(COURSE).await.unwrap().data;
    assert_eq!(ages.summary.median, Some(20.5));
    assert_eq!(ages.summary.known_percent, 50.0);
    assert_eq!(ages.bins.len(), 101);

    let gender = engine.gender(COURSE).await.unwrap().data;
    assert_eq!(gender.categories[0].percent, 100.0);

    let education = engine.education(COURSE).await.unwrap().data;
    assert_eq!(education.total, 0);

    let geo = engine.geography(COURSE).await.unwrap().data;
    assert_eq!(geo.countries.top.len(), 1);
    assert_eq!(geo.countries.all.last().unwrap().label, "Unknown");
    assert_eq!(geo.countries.known_percent, 70.0);
}

#[tokio::test]
async fn test_answer_distribution() {
    let entry = |part: &str, value: &str, count: u64, correct: bool| AnswerDistributionEntry {
        part_id: part.into(),
        answer_value: Some(value.into()),
        last_response_count: count,
        correct,
        variant: None,
        created: None,
    };
    let analytics = FakeAnalytics {
        answers: Some(vec![
            entry("p1_2_1", "4", 3, true),
            entry("p1_2_1", "5", 9, false),
            entry("p1_3_1", "blue", 2, true),
        ]),
        ..FakeAnalytics::default()
    };
    let (engine, _) = engine(analytics);

    let first = engine.answer_distribution(COURSE, "p1", None).await.unwrap().data;
    assert_eq!(first.questions.len(), 2);
    assert_eq!(first.active_part_id, "p1_2_1");
    assert_eq!(first.total_responses, 12);
    assert_eq!(first.answers[0].answer_value.as_deref(), Some("5"));
    assert_eq!(first.answers[0].percent, 75.0);

    let second = engine
        .answer_distribution(COURSE, "p1", Some("p1_3_1"))
        .await
        .unwrap()
        .data;
    assert_eq!(second.answers.len(), 1);

    let err = engine
        .answer_distribution(COURSE, "p1", Some("p1_9_1"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NodeNotFound { .. }));
}

#[tokio::test]
async fn test_missing_statistics_are_empty_states() {
    let (engine, _) = engine(FakeAnalytics::default());

    let err = engine.assignments(COURSE, None).await.unwrap_err();
    assert!(err.is_empty_state());
    let err = engine.sections(COURSE, ContentKind::Videos).await.unwrap_err();
    assert!(matches!(err, CoreError::Analytics(AnalyticsError::NoVideos { .. })));
    let err = engine.ages(COURSE).await.unwrap_err();
    assert!(err.is_empty_state());
}

#[tokio::test]
async fn test_missing_outline_is_fatal() {
    let (engine, _) = engine(problem_analytics());
    let err = engine.assignments("course-v1:Nope+X+Y", None).await.unwrap_err();
    assert!(!err.is_empty_state());
    assert!(matches!(err, CoreError::Content(ContentError::CourseNotFound { .. })));
}

#[tokio::test]
async fn test_cache_serves_repeated_requests() {
    let (engine, content) = engine(problem_analytics());
    let engine = engine.with_cache(Arc::new(MemoryCache::new()));

    let first = engine.assignments(COURSE, None).await.unwrap();
    let second = engine.assignments(COURSE, None).await.unwrap();

    assert_eq!(content.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        first.data[0].metrics.total_submissions,
        second.data[0].metrics.total_submissions
    );
    assert_eq!(first.last_updated, second.last_updated);
}
