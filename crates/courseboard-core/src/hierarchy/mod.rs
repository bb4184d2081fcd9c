//! Aggregated course hierarchies.
//!
//! One generic pipeline serves every content table:
//! - [`HierarchyBuilder`] shapes the filtered outline into nodes and merges
//!   leaf statistics
//! - [`aggregate`] rolls metrics up, numbers rows and attaches links
//! - [`ModuleProfile`] and [`LeafMetrics`] carry what differs between the
//!   problem and video variants

mod aggregate;
mod build;
mod metrics;
mod node;
mod profile;

pub use aggregate::{aggregate, no_links, LinkFn};
pub use build::HierarchyBuilder;
pub use metrics::{LeafMetrics, ProblemMetrics, VideoMetrics};
pub use node::{HierarchyNode, NodeKind};
pub use profile::{encode_module_id, LinkBuilder, ModuleProfile, ASSIGNMENT_LEVELS};
