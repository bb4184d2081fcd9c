//! Per-node metric records for problems and videos.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::analytics::{Keyed, ProblemStatistic, VideoStatistic};
use crate::stats::{average, percent};

/// Metrics carried by every node of one kind of hierarchy.
///
/// `Default` is the zero record given to leaves without statistics.
pub trait LeafMetrics: Clone + Default + Debug + Serialize {
    /// Analytics record a leaf's metrics are read from.
    type Source: Keyed;

    fn from_source(source: &Self::Source) -> Self;

    /// Add a child's raw counters into this (parent) record.
    fn absorb(&mut self, child: &Self);

    /// Derive percentages and per-module averages from the raw counters.
    fn attach_computed(&mut self, num_modules: u64);

    /// Whether there is anything to drill down into.
    fn has_activity(&self) -> bool;
}

/// Submission metrics for problems and their ancestors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemMetrics {
    pub total_submissions: u64,
    pub correct_submissions: u64,
    pub incorrect_submissions: u64,
    pub correct_percent: f64,
    pub incorrect_percent: f64,
    pub average_submissions: f64,
    pub average_correct_submissions: f64,
    pub average_incorrect_submissions: f64,
}

impl LeafMetrics for ProblemMetrics {
    type Source = ProblemStatistic;

    fn from_source(source: &ProblemStatistic) -> Self {
        let total = source.total_submissions;
        Self {
            total_submissions: total,
            correct_submissions: source.correct_submissions.min(total),
            ..Self::default()
        }
    }

    fn absorb(&mut self, child: &Self) {
        self.total_submissions += child.total_submissions;
        self.correct_submissions += child.correct_submissions;
    }

    fn attach_computed(&mut self, num_modules: u64) {
        self.incorrect_submissions = self
            .total_submissions
            .saturating_sub(self.correct_submissions);
        self.correct_percent = percent(self.correct_submissions, self.total_submissions);
        self.incorrect_percent = percent(self.incorrect_submissions, self.total_submissions);
        self.average_submissions = average(self.total_submissions, num_modules);
        self.average_correct_submissions = average(self.correct_submissions, num_modules);
        self.average_incorrect_submissions = average(self.incorrect_submissions, num_modules);
    }

    fn has_activity(&self) -> bool {
        self.total_submissions > 0
    }
}

/// Viewer metrics for videos and their ancestors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetrics {
    pub users_at_start: u64,
    pub users_at_end: u64,
    /// Viewers who reached the end, as a percent of those who started.
    pub end_percent: f64,
    /// Viewers who started but did not reach the end.
    pub start_only_users: u64,
    pub start_only_percent: f64,
    pub average_users_at_start: f64,
    pub average_users_at_end: f64,
}

impl LeafMetrics for VideoMetrics {
    type Source = VideoStatistic;

    fn from_source(source: &VideoStatistic) -> Self {
        Self {
            users_at_start: source.users_at_start,
            users_at_end: source.users_at_end,
            ..Self::default()
        }
    }

    fn absorb(&mut self, child: &Self) {
        self.users_at_start += child.users_at_start;
        self.users_at_end += child.users_at_end;
    }

    fn attach_computed(&mut self, num_modules: u64) {
        self.end_percent = percent(self.users_at_end, self.users_at_start);
        self.start_only_users = self.users_at_start.saturating_sub(self.users_at_end);
        self.start_only_percent = percent(self.start_only_users, self.users_at_start);
        self.average_users_at_start = average(self.users_at_start, num_modules);
        self.average_users_at_end = average(self.users_at_end, num_modules);
    }

    fn has_activity(&self) -> bool {
        self.users_at_start > 0
    }
}
