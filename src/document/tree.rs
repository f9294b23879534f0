//! Rendered layout tree snapshot handed over by the UI layer

use crate::document::BlockType;
use crate::Rect;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A node of the rendered layout tree.
///
/// `bounds` are absolute; the extractor rebases them on the root. Only the
/// structural class markers matter here, styling is never inspected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    #[serde(default)]
    pub classes: SmallVec<[String; 2]>,
    pub bounds: Rect,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    pub fn new(bounds: Rect) -> Self {
        Self {
            classes: SmallVec::new(),
            bounds,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_child(mut self, child: LayoutNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// All descendants in document (pre-)order, excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant carrying `class`
    pub fn query(&self, class: &str) -> Option<&LayoutNode> {
        self.descendants().find(|n| n.has_class(class))
    }

    /// Every descendant carrying `class`, in document order
    pub fn query_all<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a LayoutNode> + 'a {
        self.descendants().filter(move |n| n.has_class(class))
    }
}

/// Pre-order walk over a subtree
pub struct Descendants<'a> {
    stack: Vec<&'a LayoutNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a LayoutNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Class markers the UI puts on its rendered output to tag structural roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleSelectors {
    pub section: String,
    pub section_header: String,
    pub section_item: String,
    pub skill_group: String,
    pub highlight_item: String,
}

impl Default for RoleSelectors {
    fn default() -> Self {
        Self {
            section: "resume-section".to_string(),
            section_header: "section-header".to_string(),
            section_item: "section-item".to_string(),
            skill_group: "skill-group".to_string(),
            highlight_item: "highlight-item".to_string(),
        }
    }
}

impl RoleSelectors {
    /// Class marker for a block type
    pub fn class_for(&self, block_type: BlockType) -> &str {
        match block_type {
            BlockType::Section => &self.section,
            BlockType::SectionHeader => &self.section_header,
            BlockType::SectionItem => &self.section_item,
            BlockType::SkillGroup => &self.skill_group,
            BlockType::HighlightItem => &self.highlight_item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(class: &str, y: f32) -> LayoutNode {
        LayoutNode::new(Rect::new(0.0, y, 100.0, 10.0)).with_class(class)
    }

    #[test]
    fn test_descendants_document_order() {
        let root = LayoutNode::default()
            .with_child(node("a", 0.0).with_child(node("b", 1.0)))
            .with_child(node("c", 2.0));

        let order: Vec<_> = root
            .descendants()
            .map(|n| n.classes[0].as_str())
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_query() {
        let root = LayoutNode::default()
            .with_child(node("x", 0.0).with_child(node("item", 5.0)))
            .with_child(node("item", 20.0));

        assert_eq!(root.query("item").map(|n| n.bounds.y), Some(5.0));
        assert_eq!(root.query_all("item").count(), 2);
        assert!(root.query("missing").is_none());
    }

    #[test]
    fn test_deserialize_minimal_node() {
        let json = r#"{"classes":["resume-section"],"bounds":{"x":0,"y":12,"width":500,"height":80}}"#;
        let node: LayoutNode = serde_json::from_str(json).unwrap();
        assert!(node.has_class("resume-section"));
        assert!(node.children.is_empty());
        assert_eq!(node.bounds.height, 80.0);
    }

    #[test]
    fn test_selectors_default() {
        let selectors = RoleSelectors::default();
        assert_eq!(selectors.class_for(BlockType::Section), "resume-section");
        assert_eq!(selectors.class_for(BlockType::HighlightItem), "highlight-item");
    }
}
