//! Content blocks: the grain of pagination decisions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a content block, stable within one extraction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

/// Hands out block ids for a single extraction pass
#[derive(Debug, Default)]
pub struct BlockIdAllocator {
    next_id: u64,
}

impl BlockIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id
    pub fn next_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    #[cfg(test)]
    pub fn reset(&mut self) {
        self.next_id = 0;
    }
}

/// The kind of content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    /// A whole labeled group
    Section,
    /// The group's title
    SectionHeader,
    /// An entry within a group, e.g. one job
    SectionItem,
    /// A flat labeled sub-group
    SkillGroup,
    /// A bullet line within an entry
    HighlightItem,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Section => "section",
            BlockType::SectionHeader => "section-header",
            BlockType::SectionItem => "section-item",
            BlockType::SkillGroup => "skill-group",
            BlockType::HighlightItem => "highlight-item",
        }
    }

    /// Check if the header lookahead applies to this kind
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockType::Section | BlockType::SectionHeader)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positioned, sized unit of document flow.
///
/// `top` and `height` are pixel-equivalent offsets from the start of the
/// flow. Blocks are read-only snapshots built once per pagination pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub top: f32,
    pub height: f32,
    /// A page may start exactly at this block's top
    pub can_break: bool,
    /// This block and the next one must share a page
    pub must_keep_with_next: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<BlockId>,
}

impl ContentBlock {
    /// Create a breakable block with no keep constraints
    pub fn new(id: BlockId, block_type: BlockType, top: f32, height: f32) -> Self {
        Self {
            id,
            block_type,
            top,
            height,
            can_break: true,
            must_keep_with_next: false,
            parent_id: None,
        }
    }

    pub fn with_can_break(mut self, can_break: bool) -> Self {
        self.can_break = can_break;
        self
    }

    pub fn with_keep_with_next(mut self, keep: bool) -> Self {
        self.must_keep_with_next = keep;
        self
    }

    pub fn with_parent(mut self, parent_id: BlockId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// End offset along the flow axis
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Check if `offset` falls strictly inside this block
    pub fn straddles(&self, offset: f32) -> bool {
        offset > self.top && offset < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type() {
        assert!(BlockType::Section.is_heading());
        assert!(BlockType::SectionHeader.is_heading());
        assert!(!BlockType::SectionItem.is_heading());
        assert!(!BlockType::HighlightItem.is_heading());
        assert_eq!(BlockType::SkillGroup.to_string(), "skill-group");
    }

    #[test]
    fn test_id_allocator() {
        let mut ids = BlockIdAllocator::new();
        assert_eq!(ids.next_id(), BlockId(0));
        assert_eq!(ids.next_id(), BlockId(1));
        ids.reset();
        assert_eq!(ids.next_id(), BlockId(0));
    }

    #[test]
    fn test_block_geometry() {
        let block = ContentBlock::new(BlockId(3), BlockType::SectionItem, 100.0, 50.0);
        assert_eq!(block.bottom(), 150.0);
        assert!(block.straddles(120.0));
        assert!(!block.straddles(100.0));
        assert!(!block.straddles(150.0));
    }

    #[test]
    fn test_block_json_shape() {
        let block = ContentBlock::new(BlockId(1), BlockType::HighlightItem, 10.0, 5.0)
            .with_parent(BlockId(0));
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "highlight-item");
        assert_eq!(json["canBreak"], true);
        assert_eq!(json["mustKeepWithNext"], false);
        assert_eq!(json["parentId"], 0);
    }
}
