//! Upstream service clients.

pub mod analytics_service;
pub mod content_service;
pub mod traits;

pub use analytics_service::AnalyticsClient;
pub use content_service::ContentClient;
pub use traits::{AnalyticsSource, ContentSource};

use url::Url;

/// Append path segments to `base`, ending with a trailing slash.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments).push("");
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_and_adds_trailing_slash() {
        let base = Url::parse("https://analytics.example.org/api/v0").unwrap();
        let url = endpoint(&base, &["courses", "demo", "problems"]);
        assert_eq!(url.as_str(), "https://analytics.example.org/api/v0/courses/demo/problems/");

        let base = Url::parse("https://analytics.example.org/api/v0/").unwrap();
        let url = endpoint(&base, &["videos", "a b", "timeline"]);
        assert_eq!(url.path(), "/api/v0/videos/a%20b/timeline/");
    }
}
