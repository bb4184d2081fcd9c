//! Joining flat leaf statistics onto outline leaves.

use std::collections::HashMap;

use super::records::{ProblemStatistic, VideoStatistic};
use crate::hierarchy::{HierarchyNode, LeafMetrics};

/// Statistic records addressable by the ID of the thing they describe.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for ProblemStatistic {
    fn key(&self) -> &str {
        &self.module_id
    }
}

impl Keyed for VideoStatistic {
    fn key(&self) -> &str {
        &self.encoded_module_id
    }
}

/// Lookup of statistic records by key. The first record seen for a key wins.
#[derive(Debug)]
pub struct StatisticsIndex<'a, S> {
    by_key: HashMap<&'a str, &'a S>,
    duplicates: usize,
}

impl<'a, S: Keyed> StatisticsIndex<'a, S> {
    pub fn build(records: &'a [S]) -> Self {
        let mut by_key = HashMap::with_capacity(records.len());
        let mut duplicates = 0;
        for record in records {
            if by_key.contains_key(record.key()) {
                duplicates += 1;
                continue;
            }
            by_key.insert(record.key(), record);
        }
        if duplicates > 0 {
            tracing::debug!(duplicates, "skipped repeated statistic keys");
        }
        Self { by_key, duplicates }
    }

    pub fn get(&self, key: &str) -> Option<&'a S> {
        self.by_key.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Records dropped because their key had already been seen.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

impl<'a, S: Keyed> Default for StatisticsIndex<'a, S> {
    fn default() -> Self {
        Self {
            by_key: HashMap::new(),
            duplicates: 0,
        }
    }
}

/// Annotate leaves with their statistics.
///
/// `data_id` maps a leaf's block ID to the key the analytics service uses.
/// Leaves without a record get the zero defaults of `M`. Every leaf counts
/// as one module.
pub fn merge<M>(
    leaves: &mut [HierarchyNode<M>],
    stats: &StatisticsIndex<'_, M::Source>,
    data_id: fn(&str) -> String,
) where
    M: LeafMetrics,
    M::Source: Keyed,
{
    let mut missing = 0usize;
    for leaf in leaves.iter_mut() {
        leaf.metrics = match stats.get(&data_id(&leaf.id)) {
            Some(record) => M::from_source(record),
            None => {
                missing += 1;
                M::default()
            }
        };
        leaf.num_modules = 1;
    }
    if missing > 0 {
        tracing::debug!(missing, total = leaves.len(), "leaves without statistics defaulted to zero");
    }
}
