//! Course outline blocks as returned by the content service.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::ContentError;

/// Kind of an outline block.
///
/// Unknown kinds (`html`, `discussion`, ...) are kept verbatim in `Other`
/// so an outline never fails to parse because of a new block type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Course,
    Chapter,
    Sequential,
    Vertical,
    Problem,
    Video,
    Other(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Course => "course",
            Self::Chapter => "chapter",
            Self::Sequential => "sequential",
            Self::Vertical => "vertical",
            Self::Problem => "problem",
            Self::Video => "video",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for BlockType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "course" => Self::Course,
            "chapter" => Self::Chapter,
            "sequential" => Self::Sequential,
            "vertical" => Self::Vertical,
            "problem" => Self::Problem,
            "video" => Self::Video,
            _ => Self::Other(value),
        }
    }
}

impl From<BlockType> for String {
    fn from(value: BlockType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the static course outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub graded: bool,
    /// Assignment type ("Homework", "Exam", ...) for graded subsections.
    #[serde(default)]
    pub format: Option<String>,
    /// Ordered child IDs. `None` when the service omitted the key (a leaf).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

impl Block {
    /// Display name, falling back to the block ID for untitled blocks.
    pub fn name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.id,
        }
    }

    pub fn child_ids(&self) -> &[String] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.child_ids().is_empty()
    }

    /// Non-empty assignment type, if any.
    pub fn assignment_type(&self) -> Option<&str> {
        self.format
            .as_deref()
            .map(str::trim)
            .filter(|format| !format.is_empty())
    }
}

/// The full outline of one course: root ID plus an ID → block map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStructure {
    pub root: String,
    pub blocks: HashMap<String, Block>,
}

impl CourseStructure {
    /// Parse the content service's JSON body and check the root is present.
    pub fn from_json(body: &str) -> Result<Self, ContentError> {
        let structure: CourseStructure =
            serde_json::from_str(body).map_err(|e| ContentError::Decode(e.to_string()))?;
        structure.validate()?;
        Ok(structure)
    }

    /// Build from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ContentError> {
        let structure: CourseStructure =
            serde_json::from_value(value).map_err(|e| ContentError::Decode(e.to_string()))?;
        structure.validate()?;
        Ok(structure)
    }

    fn validate(&self) -> Result<(), ContentError> {
        if !self.blocks.contains_key(&self.root) {
            return Err(ContentError::Decode(format!(
                "root block '{}' missing from blocks",
                self.root
            )));
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Block, ContentError> {
        self.blocks
            .get(id)
            .ok_or_else(|| ContentError::UnknownBlock(id.to_string()))
    }

    /// Direct children of `id` in document order. Dangling child IDs are skipped.
    pub fn children_of<'a>(&'a self, id: &str) -> Vec<&'a Block> {
        let Some(block) = self.blocks.get(id) else {
            return Vec::new();
        };
        block
            .child_ids()
            .iter()
            .filter_map(|child_id| {
                let child = self.blocks.get(child_id);
                if child.is_none() {
                    tracing::warn!(parent = %id, child = %child_id, "dangling child reference in outline");
                }
                child
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: &str = r#"{
        "root": "course",
        "blocks": {
            "course": {"id": "course", "type": "course", "display_name": "Demo", "children": ["ch1"]},
            "ch1": {"id": "ch1", "type": "chapter", "display_name": "Week 1", "children": ["seq1", "gone"]},
            "seq1": {"id": "seq1", "type": "sequential", "display_name": "HW", "graded": true, "format": "Homework", "children": ["html1"]},
            "html1": {"id": "html1", "type": "html", "display_name": ""}
        }
    }"#;

    #[test]
    fn parses_outline_and_unknown_types() {
        let structure = CourseStructure::from_json(OUTLINE).unwrap();
        assert_eq!(structure.len(), 4);
        let html = structure.get("html1").unwrap();
        assert_eq!(html.block_type, BlockType::Other("html".into()));
        assert!(html.is_leaf());
        assert_eq!(html.name(), "html1");

        let seq = structure.get("seq1").unwrap();
        assert!(seq.graded);
        assert_eq!(seq.assignment_type(), Some("Homework"));
    }

    #[test]
    fn children_of_skips_dangling_ids() {
        let structure = CourseStructure::from_json(OUTLINE).unwrap();
        let children = structure.children_of("ch1");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "seq1");
    }

    #[test]
    fn missing_root_is_a_decode_error() {
        let body = r#"{"root": "nope", "blocks": {}}"#;
        assert!(matches!(
            CourseStructure::from_json(body),
            Err(ContentError::Decode(_))
        ));
    }

    #[test]
    fn block_type_serializes_as_plain_string() {
        let value = serde_json::to_value(BlockType::Sequential).unwrap();
        assert_eq!(value, serde_json::json!("sequential"));
        let other: BlockType = serde_json::from_value(serde_json::json!("discussion")).unwrap();
        assert_eq!(other.as_str(), "discussion");
    }

    #[test]
    fn blank_format_is_not_an_assignment_type() {
        let block = Block {
            id: "b".into(),
            block_type: BlockType::Sequential,
            display_name: None,
            graded: true,
            format: Some("  ".into()),
            children: None,
        };
        assert_eq!(block.assignment_type(), None);
    }
}
