//! # Courseboard Core Library
//!
//! This library provides the core of a course-analytics dashboard: it turns a
//! course outline from the content service and flat learner statistics from
//! the analytics service into aggregated, chart-ready view models. A
//! standalone CLI binary exposes every operation; any web front end is a thin
//! layer over the same library.
//!
//! ## Architecture
//!
//! - **Content**: block tree model and depth-first filtering where the first
//!   match on a path wins
//! - **Analytics**: statistic records, the leaf merger and answer distributions
//! - **Hierarchy**: one generic bottom-up aggregator shared by the problem and
//!   video tables
//! - **Timeline**: gap filling for video timelines and enrollment trends
//! - **Stats**: weighted-median age, known-population shares, top-N rankings
//! - **Engine**: fetches through an injected cache and returns [`Report`]s
//!
//! ## Key Components
//!
//! - [`CourseEngine`]: public operations over one pair of services
//! - [`CourseStructure`]: parsed course outline
//! - [`HierarchyNode`]: aggregated table row
//! - [`Config`]: TOML configuration management
//! - [`Cache`]: injected key-value store with TTL

pub mod analytics;
pub mod cache;
pub mod clock;
pub mod content;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod integrations;
pub mod stats;
pub mod storage;
pub mod timeline;

pub use analytics::{AnswerDistribution, ProblemStatistic, VideoStatistic};
pub use cache::{Cache, MemoryCache, NoopCache};
pub use clock::{Clock, FixedClock, SystemClock};
pub use content::{Block, BlockType, CourseStructure};
pub use engine::{ContentKind, CourseEngine, EngineSettings, EnrollmentTrend, Hierarchy, Report};
pub use error::{AnalyticsError, ConfigError, ContentError, CoreError, Result};
pub use hierarchy::{HierarchyNode, NodeKind, ProblemMetrics, VideoMetrics};
pub use integrations::{AnalyticsClient, AnalyticsSource, ContentClient, ContentSource};
pub use storage::Config;
pub use timeline::{TimelineSegment, VideoTimeline};
