//! Depth-first outline filtering.
//!
//! Selects the topmost blocks under a root that satisfy a [`BlockFilter`].
//! Once a block matches, its subtree is not searched further, so a matching
//! descendant of a matching ancestor is never returned twice.

use std::collections::HashSet;

use super::block::{Block, BlockType, CourseStructure};

/// Predicate over outline blocks. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockFilter {
    pub block_type: Option<BlockType>,
    pub graded: Option<bool>,
    pub assignment_type: Option<String>,
    /// Reject blocks without a real (non-blank) assignment type.
    pub require_format: bool,
}

impl BlockFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on block type only.
    pub fn of_type(block_type: BlockType) -> Self {
        Self {
            block_type: Some(block_type),
            ..Self::default()
        }
    }

    pub fn graded(mut self, graded: bool) -> Self {
        self.graded = Some(graded);
        self
    }

    /// Optional so callers can pass an unset query parameter straight through.
    pub fn assignment_type(mut self, assignment_type: Option<&str>) -> Self {
        self.assignment_type = assignment_type.map(str::to_string);
        self
    }

    pub fn require_format(mut self) -> Self {
        self.require_format = true;
        self
    }

    pub fn matches(&self, block: &Block) -> bool {
        if let Some(block_type) = &self.block_type {
            if &block.block_type != block_type {
                return false;
            }
        }
        if let Some(graded) = self.graded {
            if block.graded != graded {
                return false;
            }
        }
        if let Some(wanted) = &self.assignment_type {
            if block.format.as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }
        if self.require_format && block.assignment_type().is_none() {
            return false;
        }
        true
    }
}

/// Collect the first matching block on every path below `root_id`.
///
/// The root itself is never a candidate. Results keep document order.
/// Unknown roots yield an empty list.
pub fn filter_children<'a>(
    structure: &'a CourseStructure,
    root_id: &str,
    filter: &BlockFilter,
) -> Vec<&'a Block> {
    let mut matched = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(root_id.to_string());

    for child in structure.children_of(root_id) {
        collect(structure, child, filter, &mut matched, &mut visited);
    }
    matched
}

fn collect<'a>(
    structure: &'a CourseStructure,
    block: &'a Block,
    filter: &BlockFilter,
    matched: &mut Vec<&'a Block>,
    visited: &mut HashSet<String>,
) {
    if !visited.insert(block.id.clone()) {
        tracing::warn!(block = %block.id, "block reached twice while filtering outline; skipping");
        return;
    }

    if filter.matches(block) {
        matched.push(block);
        return;
    }

    for child in structure.children_of(&block.id) {
        collect(structure, child, filter, matched, visited);
    }
}

/// IDs of [`filter_children`] results.
pub fn filter_child_ids(
    structure: &CourseStructure,
    root_id: &str,
    filter: &BlockFilter,
) -> Vec<String> {
    filter_children(structure, root_id, filter)
        .into_iter()
        .map(|block| block.id.clone())
        .collect()
}
