//! Content block extraction from a layout snapshot

use crate::document::{BlockIdAllocator, BlockType, ContentBlock, LayoutNode, RoleSelectors};

/// Walk the layout tree and emit the annotated blocks, sorted by `top`.
///
/// Offsets are rebased on `root` so that `top = 0` is the start of the flow.
/// Missing optional parts (no header, no items) are simply left out.
pub fn extract_blocks(root: &LayoutNode, selectors: &RoleSelectors) -> Vec<ContentBlock> {
    let mut ids = BlockIdAllocator::new();
    let origin = root.bounds.y;
    let mut blocks = Vec::new();

    let make = |ids: &mut BlockIdAllocator, block_type, node: &LayoutNode| {
        ContentBlock::new(
            ids.next_id(),
            block_type,
            node.bounds.y - origin,
            node.bounds.height,
        )
    };

    for section in root.query_all(selectors.class_for(BlockType::Section)) {
        blocks.push(make(&mut ids, BlockType::Section, section));

        if let Some(header) = section.query(selectors.class_for(BlockType::SectionHeader)) {
            blocks.push(make(&mut ids, BlockType::SectionHeader, header).with_keep_with_next(true));
        }

        // The first item is glued to its header
        for (index, item) in section
            .query_all(selectors.class_for(BlockType::SectionItem))
            .enumerate()
        {
            let item_block = make(&mut ids, BlockType::SectionItem, item).with_can_break(index > 0);
            let item_id = item_block.id;
            blocks.push(item_block);

            for highlight in item.query_all(selectors.class_for(BlockType::HighlightItem)) {
                blocks.push(make(&mut ids, BlockType::HighlightItem, highlight).with_parent(item_id));
            }
        }

        for (index, group) in section
            .query_all(selectors.class_for(BlockType::SkillGroup))
            .enumerate()
        {
            blocks.push(make(&mut ids, BlockType::SkillGroup, group).with_can_break(index > 0));
        }
    }

    // Stable: extraction order breaks ties
    blocks.sort_by(|a, b| a.top.total_cmp(&b.top));

    log::debug!("Extracted {} content blocks", blocks.len());
    blocks
}
