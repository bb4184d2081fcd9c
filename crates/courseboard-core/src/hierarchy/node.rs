//! Aggregated view-model node.

use serde::Serialize;

use crate::content::{Block, BlockType};

/// Whether a node carries its own statistics or sums its children's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Leaf,
    Parent,
}

/// One row of a hierarchy table (section, subsection, assignment, problem, video).
#[derive(Debug, Clone, Serialize)]
pub struct HierarchyNode<M> {
    pub id: String,
    pub name: String,
    pub block_type: BlockType,
    pub kind: NodeKind,
    /// 1-based position among siblings; 0 until aggregated.
    pub index: usize,
    /// Leaf descendants (1 for a leaf).
    pub num_modules: u64,
    #[serde(flatten)]
    pub metrics: M,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode<M>>,
}

impl<M: Default> HierarchyNode<M> {
    pub fn leaf(id: impl Into<String>, name: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            block_type,
            kind: NodeKind::Leaf,
            index: 0,
            num_modules: 1,
            metrics: M::default(),
            url: None,
            children: Vec::new(),
        }
    }

    pub fn parent(
        id: impl Into<String>,
        name: impl Into<String>,
        block_type: BlockType,
        children: Vec<HierarchyNode<M>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            block_type,
            kind: NodeKind::Parent,
            index: 0,
            num_modules: 0,
            metrics: M::default(),
            url: None,
            children,
        }
    }

    pub fn leaf_from_block(block: &Block) -> Self {
        Self::leaf(&block.id, block.name(), block.block_type.clone())
    }

    pub fn parent_from_block(block: &Block, children: Vec<HierarchyNode<M>>) -> Self {
        Self::parent(&block.id, block.name(), block.block_type.clone(), children)
    }
}

impl<M> HierarchyNode<M> {
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }
}
