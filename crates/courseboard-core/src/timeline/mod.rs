//! Chart series built from sparse analytics data.
//!
//! This module provides:
//! - Gap filling for indexed and dated series
//! - Dense per-segment video watch timelines
//! - Daily enrollment trends with a weekly summary

mod gap;
mod trend;
mod video;

pub use gap::{fill_date_gaps, fill_index_gaps, pin_end_boundary, BucketedPoint, DatedPoint, IndexedPoint};
pub use trend::{enrollment_summary, enrollment_trend, EnrollmentSummary};
pub use video::{
    build_video_timeline, TimelineSegment, VideoTimeline, DEFAULT_SEGMENT_SIZE, MAX_VIDEO_SECONDS,
};
