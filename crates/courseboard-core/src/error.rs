//! Core error types for courseboard-core.
//!
//! This module defines the error hierarchy using thiserror. Errors from the
//! two upstream services are kept apart so callers can tell a fatal outline
//! failure from an empty analytics result.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for courseboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Course outline (content service) errors
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Learner analytics service errors
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Requested outline node does not exist in the filtered hierarchy
    #[error("No {level} with id '{id}' in course outline")]
    NodeNotFound { level: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// True for conditions the caller should render as an empty state
    /// (nothing submitted or watched yet) rather than as a failure.
    pub fn is_empty_state(&self) -> bool {
        matches!(self, CoreError::Analytics(err) if err.is_empty_state())
    }
}

/// Content service (block tree) errors. All of these are fatal for the
/// request: there is no partial hierarchy to aggregate without the outline.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The service has no outline for this course
    #[error("Course '{course_id}' not found by content service")]
    CourseNotFound { course_id: String },

    /// Non-success HTTP status
    #[error("Content service returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Connection/timeout failures
    #[error("Content service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body did not match the outline contract
    #[error("Malformed course outline: {0}")]
    Decode(String),

    /// A referenced block is missing from the outline
    #[error("Block '{0}' not present in course outline")]
    UnknownBlock(String),
}

/// Analytics service errors.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// No learner has submitted any problem yet
    #[error("No problem submissions yet for course '{course_id}'")]
    NoSubmissions { course_id: String },

    /// No learner has watched any video yet
    #[error("No video views yet for course '{course_id}'")]
    NoVideos { course_id: String },

    /// No timeline data for a single video
    #[error("No timeline data for video '{video_id}'")]
    NoTimeline { video_id: String },

    /// No enrollment or demographic data
    #[error("No enrollment data for course '{course_id}'")]
    NoEnrollment { course_id: String },

    /// No answer distribution for a problem
    #[error("No answer distribution for problem '{problem_id}'")]
    NoAnswers { problem_id: String },

    /// Non-success HTTP status other than 404
    #[error("Analytics service returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Connection/timeout failures
    #[error("Analytics service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body did not match the expected contract
    #[error("Malformed analytics response: {0}")]
    Decode(String),
}

impl AnalyticsError {
    /// Whether this is a "nothing recorded yet" condition.
    pub fn is_empty_state(&self) -> bool {
        matches!(
            self,
            AnalyticsError::NoSubmissions { .. }
                | AnalyticsError::NoVideos { .. }
                | AnalyticsError::NoTimeline { .. }
                | AnalyticsError::NoEnrollment { .. }
                | AnalyticsError::NoAnswers { .. }
        )
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
