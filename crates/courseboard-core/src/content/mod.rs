//! Course outline loading and classification.
//!
//! This module provides:
//! - The block tree data model returned by the content service
//! - Depth-first filtering by type, graded flag and assignment type
//! - Section / subsection / assignment level helpers

mod block;
mod filter;
pub mod outline;

pub use block::{Block, BlockType, CourseStructure};
pub use filter::{filter_child_ids, filter_children, BlockFilter};
