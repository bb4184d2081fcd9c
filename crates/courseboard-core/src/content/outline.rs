//! Outline level helpers: sections, subsections, assignments.

use super::block::{Block, BlockType, CourseStructure};
use super::filter::{filter_children, BlockFilter};

/// Chapters directly reachable from the course root.
pub fn sections(structure: &CourseStructure) -> Vec<&Block> {
    filter_children(
        structure,
        &structure.root,
        &BlockFilter::of_type(BlockType::Chapter),
    )
}

/// Sequentials under a chapter, optionally restricted by graded flag.
pub fn subsections<'a>(
    structure: &'a CourseStructure,
    section_id: &str,
    graded: Option<bool>,
) -> Vec<&'a Block> {
    let mut filter = BlockFilter::of_type(BlockType::Sequential);
    filter.graded = graded;
    filter_children(structure, section_id, &filter)
}

/// Graded subsections carrying a real assignment type.
///
/// `assignment_type` narrows the listing to one type when given.
pub fn assignments<'a>(
    structure: &'a CourseStructure,
    assignment_type: Option<&str>,
) -> Vec<&'a Block> {
    let filter = BlockFilter::of_type(BlockType::Sequential)
        .graded(true)
        .assignment_type(assignment_type)
        .require_format();
    filter_children(structure, &structure.root, &filter)
}

/// Distinct assignment types of the course in document order.
pub fn assignment_types(structure: &CourseStructure) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for assignment in assignments(structure, None) {
        if let Some(kind) = assignment.assignment_type() {
            if !types.iter().any(|seen| seen == kind) {
                types.push(kind.to_string());
            }
        }
    }
    types
}

/// Leaves of `module_type` below a block, skipping verticals and other wrappers.
pub fn modules<'a>(
    structure: &'a CourseStructure,
    parent_id: &str,
    module_type: &BlockType,
) -> Vec<&'a Block> {
    filter_children(
        structure,
        parent_id,
        &BlockFilter::of_type(module_type.clone()),
    )
}
