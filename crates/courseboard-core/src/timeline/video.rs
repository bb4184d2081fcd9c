//! Per-segment video watch timeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::gap::{fill_index_gaps, pin_end_boundary, BucketedPoint, IndexedPoint};
use crate::analytics::{last_updated, VideoSegmentRecord};

/// Seconds per segment used by the analytics pipeline when it does not say.
pub const DEFAULT_SEGMENT_SIZE: u64 = 5;

/// Longest video a timeline is built for, in seconds. Segment indices and
/// durations past it are treated as corrupt upstream counters.
pub const MAX_VIDEO_SECONDS: u64 = 24 * 60 * 60;

/// Viewer counts for one segment of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub index: u64,
    pub num_users: u64,
    pub num_views: u64,
    /// Views beyond the first per user.
    pub num_replays: u64,
    /// Offset into the video, in seconds.
    pub start_time: u64,
}

impl TimelineSegment {
    pub fn new(index: u64, num_users: u64, num_views: u64, segment_size: u64) -> Self {
        Self {
            index,
            num_users,
            num_views,
            num_replays: num_views.saturating_sub(num_users),
            start_time: index.saturating_mul(segment_size),
        }
    }
}

impl IndexedPoint for TimelineSegment {
    fn index(&self) -> u64 {
        self.index
    }

    fn placeholder(index: u64) -> Self {
        // start_time is fixed up by the caller, which knows the segment size.
        Self::new(index, 0, 0, 0)
    }
}

impl BucketedPoint for TimelineSegment {
    fn start(&self) -> u64 {
        self.start_time
    }

    fn pinned_at(&self, boundary: u64) -> Self {
        Self {
            index: self.index.saturating_add(1),
            start_time: boundary,
            ..self.clone()
        }
    }
}

/// Dense timeline for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTimeline {
    pub segments: Vec<TimelineSegment>,
    pub segment_size: u64,
    pub duration: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Build a gap-free timeline from sparse pipeline segments.
///
/// With a known `duration` the timeline spans `ceil(duration / segment_size)`
/// segments plus, when the duration ends mid-segment, a terminal point at
/// the duration itself. Without one it spans up to the last recorded
/// segment. No segment starts after the duration, so rebuilding a timeline
/// from its own segments reproduces it.
pub fn build_video_timeline(
    records: &[VideoSegmentRecord],
    duration: Option<u64>,
    segment_size: u64,
) -> VideoTimeline {
    let segment_size = segment_size.max(1);
    let max_segment = MAX_VIDEO_SECONDS / segment_size;

    let duration = duration.filter(|&duration| {
        let sane = duration <= MAX_VIDEO_SECONDS;
        if !sane {
            tracing::warn!(duration, "ignoring implausible video duration");
        }
        sane
    });

    let usable: Vec<&VideoSegmentRecord> = records
        .iter()
        .filter(|r| {
            let sane = r.segment <= max_segment;
            if !sane {
                tracing::warn!(segment = r.segment, "dropping out-of-range timeline segment");
            }
            sane
        })
        .collect();

    let recorded = usable
        .iter()
        .map(|r| TimelineSegment::new(r.segment, r.num_users, r.num_views, segment_size));

    let expected_len = match duration {
        Some(duration) => duration.div_ceil(segment_size),
        None => usable.iter().map(|r| r.segment + 1).max().unwrap_or(0),
    };

    let mut segments: Vec<TimelineSegment> = fill_index_gaps(recorded, expected_len)
        .into_iter()
        .map(|mut segment| {
            let start = segment.index.saturating_mul(segment_size);
            segment.start_time = duration.map_or(start, |duration| start.min(duration));
            segment
        })
        .collect();

    if let Some(duration) = duration {
        if pin_end_boundary(&mut segments, duration, segment_size) {
            tracing::debug!(duration, "pinned terminal timeline point at video end");
        }
    }

    VideoTimeline {
        segments,
        segment_size,
        duration,
        last_updated: last_updated(usable.iter().copied()),
    }
}
