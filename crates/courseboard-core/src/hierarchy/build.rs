//! Turning a filtered outline into unaggregated hierarchy nodes.

use super::metrics::LeafMetrics;
use super::node::HierarchyNode;
use super::profile::ModuleProfile;
use crate::analytics::{merge, StatisticsIndex};
use crate::content::{outline, CourseStructure};

/// Builds hierarchy forests for one profile over one course outline.
pub struct HierarchyBuilder<'a> {
    structure: &'a CourseStructure,
    profile: &'a ModuleProfile,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(structure: &'a CourseStructure, profile: &'a ModuleProfile) -> Self {
        Self { structure, profile }
    }

    /// Section → subsection → module forest.
    ///
    /// Subsections without modules of the profile's type are dropped, and so
    /// are sections left without subsections.
    pub fn sections<M: LeafMetrics>(
        &self,
        stats: &StatisticsIndex<'_, M::Source>,
    ) -> Vec<HierarchyNode<M>> {
        outline::sections(self.structure)
            .into_iter()
            .filter_map(|section| {
                let subsections: Vec<HierarchyNode<M>> = outline::subsections(
                    self.structure,
                    &section.id,
                    self.profile.subsection_graded,
                )
                .into_iter()
                .filter_map(|subsection| {
                    let modules = self.modules(&subsection.id, stats);
                    if modules.is_empty() {
                        None
                    } else {
                        Some(HierarchyNode::parent_from_block(subsection, modules))
                    }
                })
                .collect();

                if subsections.is_empty() {
                    None
                } else {
                    Some(HierarchyNode::parent_from_block(section, subsections))
                }
            })
            .collect()
    }

    /// Assignment → problem forest for graded subsections.
    ///
    /// Assignments are kept even when they hold no problems so every graded
    /// item of the requested type is listed.
    pub fn assignments<M: LeafMetrics>(
        &self,
        assignment_type: Option<&str>,
        stats: &StatisticsIndex<'_, M::Source>,
    ) -> Vec<HierarchyNode<M>> {
        outline::assignments(self.structure, assignment_type)
            .into_iter()
            .map(|assignment| {
                let problems = self.modules(&assignment.id, stats);
                HierarchyNode::parent_from_block(assignment, problems)
            })
            .collect()
    }

    /// Leaf nodes below `parent_id` with statistics merged in.
    pub fn modules<M: LeafMetrics>(
        &self,
        parent_id: &str,
        stats: &StatisticsIndex<'_, M::Source>,
    ) -> Vec<HierarchyNode<M>> {
        let mut leaves: Vec<HierarchyNode<M>> =
            outline::modules(self.structure, parent_id, &self.profile.module_type)
                .into_iter()
                .map(HierarchyNode::leaf_from_block)
                .collect();
        merge(&mut leaves, stats, self.profile.data_id);
        leaves
    }
}
