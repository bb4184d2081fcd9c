//! View models returned by the engine.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::analytics::EnrollmentDay;
use crate::error::{CoreError, Result};
use crate::hierarchy::{HierarchyNode, ModuleProfile, ProblemMetrics, VideoMetrics};
use crate::timeline::EnrollmentSummary;

/// A view model plus the freshness of the statistics behind it.
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub data: T,
    /// Newest `created` across the records used; `None` when there were none.
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Report<T> {
    pub fn new(data: T, last_updated: Option<DateTime<Utc>>) -> Self {
        Self { data, last_updated }
    }
}

/// Which section table to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    GradedProblems,
    UngradedProblems,
    Videos,
}

impl ContentKind {
    pub fn profile(self) -> ModuleProfile {
        match self {
            ContentKind::GradedProblems => ModuleProfile::graded_problems(),
            ContentKind::UngradedProblems => ModuleProfile::ungraded_problems(),
            ContentKind::Videos => ModuleProfile::videos(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::GradedProblems => "graded",
            ContentKind::UngradedProblems => "ungraded",
            ContentKind::Videos => "videos",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "graded" => Ok(ContentKind::GradedProblems),
            "ungraded" => Ok(ContentKind::UngradedProblems),
            "videos" => Ok(ContentKind::Videos),
            other => Err(format!("unknown content kind '{other}' (expected graded, ungraded or videos)")),
        }
    }
}

/// Aggregated rows of either metric family.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Hierarchy {
    Problems(Vec<HierarchyNode<ProblemMetrics>>),
    Videos(Vec<HierarchyNode<VideoMetrics>>),
}

impl Hierarchy {
    pub fn len(&self) -> usize {
        match self {
            Hierarchy::Problems(nodes) => nodes.len(),
            Hierarchy::Videos(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn problems(&self) -> Option<&[HierarchyNode<ProblemMetrics>]> {
        match self {
            Hierarchy::Problems(nodes) => Some(nodes),
            Hierarchy::Videos(_) => None,
        }
    }

    pub fn videos(&self) -> Option<&[HierarchyNode<VideoMetrics>]> {
        match self {
            Hierarchy::Videos(nodes) => Some(nodes),
            Hierarchy::Problems(_) => None,
        }
    }

    /// Rows below the node reached by following `path` from the top level.
    pub(crate) fn descend(self, path: &[(&'static str, &str)]) -> Result<Self> {
        Ok(match self {
            Hierarchy::Problems(nodes) => Hierarchy::Problems(descend(nodes, path)?),
            Hierarchy::Videos(nodes) => Hierarchy::Videos(descend(nodes, path)?),
        })
    }
}

pub(crate) fn descend<M>(
    mut nodes: Vec<HierarchyNode<M>>,
    path: &[(&'static str, &str)],
) -> Result<Vec<HierarchyNode<M>>> {
    for &(level, id) in path {
        let node = nodes
            .into_iter()
            .find(|node| node.id == id)
            .ok_or_else(|| CoreError::NodeNotFound {
                level,
                id: id.to_string(),
            })?;
        nodes = node.children;
    }
    Ok(nodes)
}

/// Filled daily enrollment with headline numbers.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentTrend {
    pub days: Vec<EnrollmentDay>,
    pub summary: EnrollmentSummary,
}
