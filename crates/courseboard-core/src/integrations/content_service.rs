//! Content service client: course outlines via the blocks API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::endpoint;
use super::traits::ContentSource;
use crate::content::CourseStructure;
use crate::error::ContentError;
use crate::storage::ServiceConfig;

/// Block fields the outline needs.
const REQUESTED_FIELDS: &str = "children,graded,format,display_name";

pub struct ContentClient {
    base_url: Url,
    token: String,
    http_client: Client,
}

impl ContentClient {
    /// Build a client from service settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ServiceConfig) -> Result<Self, ContentError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ContentError::Decode(format!("invalid content service URL: {e}")))?;
        let http_client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            base_url,
            token: config.token.clone(),
            http_client,
        })
    }

    fn blocks_url(&self, course_id: &str) -> Url {
        let mut url = endpoint(&self.base_url, &["blocks"]);
        url.query_pairs_mut()
            .append_pair("course_id", course_id)
            .append_pair("depth", "all")
            .append_pair("all_blocks", "true")
            .append_pair("requested_fields", REQUESTED_FIELDS);
        url
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn course_structure(&self, course_id: &str) -> Result<CourseStructure, ContentError> {
        let url = self.blocks_url(course_id);
        tracing::debug!(course_id, %url, "fetching course outline");

        let mut request = self.http_client.get(url.clone());
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }
        let resp = request.send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(ContentError::CourseNotFound {
                course_id: course_id.to_string(),
            }),
            status if !status.is_success() => Err(ContentError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            _ => {
                let body = resp.text().await?;
                let structure = CourseStructure::from_json(&body)?;
                tracing::info!(course_id, blocks = structure.len(), "loaded course outline");
                Ok(structure)
            }
        }
    }
}
