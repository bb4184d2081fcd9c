//! HTTP client tests against a mock content/analytics server.

use mockito::Matcher;

use courseboard_core::error::{AnalyticsError, ContentError};
use courseboard_core::storage::ServiceConfig;
use courseboard_core::{AnalyticsClient, AnalyticsSource, ContentClient, ContentSource};

fn service(base_url: String) -> ServiceConfig {
    ServiceConfig {
        base_url,
        token: "secret".into(),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_content_client_fetches_outline() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/courses/v1/blocks/")
        .match_header("authorization", "Bearer secret")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("course_id".into(), "course-v1:edX+DemoX+T1".into()),
            Matcher::UrlEncoded("depth".into(), "all".into()),
            Matcher::UrlEncoded("all_blocks".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"root": "c", "blocks": {
                "c": {"id": "c", "type": "course", "children": ["ch"]},
                "ch": {"id": "ch", "type": "chapter", "display_name": "Week 1"}
            }}"#,
        )
        .create_async()
        .await;

    let client = ContentClient::new(&service(format!("{}/api/courses/v1", server.url()))).unwrap();
    let structure = client.course_structure("course-v1:edX+DemoX+T1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(structure.root, "c");
    assert_eq!(structure.len(), 2);
}

#[tokio::test]
async fn test_content_client_maps_status_codes() {
    let mut server = mockito::Server::new_async().await;
    let _missing = server
        .mock("GET", "/blocks/")
        .match_query(Matcher::UrlEncoded("course_id".into(), "missing".into()))
        .with_status(404)
        .create_async()
        .await;
    let _broken = server
        .mock("GET", "/blocks/")
        .match_query(Matcher::UrlEncoded("course_id".into(), "broken".into()))
        .with_status(503)
        .create_async()
        .await;
    let _garbled = server
        .mock("GET", "/blocks/")
        .match_query(Matcher::UrlEncoded("course_id".into(), "garbled".into()))
        .with_status(200)
        .with_body(r#"{"root": "x", "blocks": {}}"#)
        .create_async()
        .await;

    let client = ContentClient::new(&service(server.url())).unwrap();

    let err = client.course_structure("missing").await.unwrap_err();
    assert!(matches!(err, ContentError::CourseNotFound { .. }));

    let err = client.course_structure("broken").await.unwrap_err();
    assert!(matches!(err, ContentError::Http { status: 503, .. }));

    let err = client.course_structure("garbled").await.unwrap_err();
    assert!(matches!(err, ContentError::Decode(_)));
}

#[tokio::test]
async fn test_analytics_client_decodes_lenient_records() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v0/courses/demo/problems/")
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_body(
            r#"[
                {"module_id": "p1", "total_submissions": 10, "correct_submissions": 7,
                 "part_ids": ["p1_2_1"], "created": "2024-05-01T120000"},
                {"module_id": "p2", "total_submissions": null, "correct_submissions": -3,
                 "part_ids": [], "created": "not a date"}
            ]"#,
        )
        .create_async()
        .await;

    let client = AnalyticsClient::new(&service(format!("{}/api/v0", server.url()))).unwrap();
    let problems = client.problems("demo").await.unwrap();

    mock.assert_async().await;
    assert_eq!(problems.len(), 2);
    assert_eq!(problems[0].correct_submissions, 7);
    assert!(problems[0].created.is_some());
    assert_eq!(problems[1].total_submissions, 0);
    assert_eq!(problems[1].correct_submissions, 0);
    assert!(problems[1].created.is_none());
}

#[tokio::test]
async fn test_analytics_not_found_is_an_empty_state() {
    let mut server = mockito::Server::new_async().await;
    let _videos = server
        .mock("GET", "/courses/demo/videos/")
        .with_status(404)
        .create_async()
        .await;
    let _timeline = server
        .mock("GET", "/videos/v1/timeline/")
        .with_status(404)
        .create_async()
        .await;
    let _ages = server
        .mock("GET", "/courses/demo/enrollment/birth_year/")
        .with_status(404)
        .create_async()
        .await;
    let _answers = server
        .mock("GET", "/problems/p1/answer_distribution/")
        .with_status(500)
        .create_async()
        .await;

    let client = AnalyticsClient::new(&service(server.url())).unwrap();

    let err = client.videos("demo").await.unwrap_err();
    assert!(matches!(err, AnalyticsError::NoVideos { .. }));
    assert!(err.is_empty_state());

    let err = client.video_timeline("v1").await.unwrap_err();
    assert!(matches!(err, AnalyticsError::NoTimeline { .. }));

    let err = client.birth_years("demo").await.unwrap_err();
    assert!(matches!(err, AnalyticsError::NoEnrollment { .. }));

    let err = client.answer_distribution("p1").await.unwrap_err();
    assert!(matches!(err, AnalyticsError::Http { status: 500, .. }));
    assert!(!err.is_empty_state());
}

#[tokio::test]
async fn test_enrollment_endpoints() {
    let mut server = mockito::Server::new_async().await;
    let _trend = server
        .mock("GET", "/courses/demo/enrollment/")
        .with_status(200)
        .with_body(r#"[{"date": "2024-03-01", "count": 10, "created": "2024-03-02T000000"}]"#)
        .create_async()
        .await;
    let _location = server
        .mock("GET", "/courses/demo/enrollment/location/")
        .with_status(200)
        .with_body(r#"[{"country_code": "BR", "country_name": "Brazil", "count": 4}]"#)
        .create_async()
        .await;

    let client = AnalyticsClient::new(&service(server.url())).unwrap();
    let days = client.enrollment("demo").await.unwrap();
    assert_eq!(days[0].count, 10);

    let locations = client.locations("demo").await.unwrap();
    assert_eq!(locations[0].country_name.as_deref(), Some("Brazil"));
}

#[test]
fn test_invalid_base_url_is_rejected() {
    assert!(ContentClient::new(&service("not a url".into())).is_err());
    assert!(AnalyticsClient::new(&service("::".into())).is_err());
}
