//! Bottom-up aggregation of leaf metrics.

use super::metrics::LeafMetrics;
use super::node::{HierarchyNode, NodeKind};

/// Builds a drill-down URL from the IDs on the path to a node
/// (top-level ancestor first, the node itself last).
pub type LinkFn<'a> = dyn Fn(&[&str]) -> Option<String> + 'a;

/// Aggregate a forest in place.
///
/// Children are aggregated before their parent. Every parent's raw counters
/// become the sum of its children's and its `num_modules` the sum of theirs;
/// derived percentages and averages are then recomputed. Siblings are
/// numbered 1.. in order. A node gets a URL only when it has activity.
pub fn aggregate<M: LeafMetrics>(nodes: &mut [HierarchyNode<M>], link: &LinkFn<'_>) {
    let mut path = Vec::new();
    aggregate_level(nodes, &mut path, link);
}

fn aggregate_level<M: LeafMetrics>(
    nodes: &mut [HierarchyNode<M>],
    path: &mut Vec<String>,
    link: &LinkFn<'_>,
) {
    for (position, node) in nodes.iter_mut().enumerate() {
        node.index = position + 1;
        path.push(node.id.clone());

        if node.kind == NodeKind::Parent {
            aggregate_level(&mut node.children, path, link);

            let mut metrics = M::default();
            let mut num_modules = 0;
            for child in &node.children {
                metrics.absorb(&child.metrics);
                num_modules += child.num_modules;
            }
            node.metrics = metrics;
            node.num_modules = num_modules;
        }

        node.metrics.attach_computed(node.num_modules);
        node.url = if node.metrics.has_activity() {
            let ids: Vec<&str> = path.iter().map(String::as_str).collect();
            link(&ids)
        } else {
            None
        };

        path.pop();
    }
}

/// Never link anywhere.
pub fn no_links(_: &[&str]) -> Option<String> {
    None
}
