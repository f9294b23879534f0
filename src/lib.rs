//! resume-pager: pagination core for print-ready resume output
//!
//! This crate provides:
//! - Content block extraction from a rendered layout snapshot
//! - Break-point calculation with keep-with-next, header lookahead and
//!   oversized-block splitting
//! - Page slicing of the scaled content surface
//! - A page renderer that drives a rasterizer and assembles pages in order

pub mod document;
pub mod error;
pub mod layout;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use document::{extract_blocks, BlockId, BlockType, ContentBlock, LayoutNode, RoleSelectors};
pub use error::{Error, Result};
pub use layout::{
    calculate_break_points, calculate_page_slices, PageBreakConfig, PageBreakResult, PageSlice,
};
pub use render::{
    CancelFlag, IsolatedRasterizer, PageRenderer, PdfRendererOptions, Rasterizer, RenderedDocument,
};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Layout rectangle in pixel-equivalent units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Everything one pagination pass produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub blocks: Vec<ContentBlock>,
    pub result: PageBreakResult,
    /// Height of the whole content flow
    pub total_height: f32,
}

impl Pagination {
    /// Capture regions at the given rasterization scale
    pub fn slices(&self, scale: f32) -> Vec<PageSlice> {
        calculate_page_slices(&self.result.break_points, self.total_height, scale)
    }

    pub fn page_count(&self) -> usize {
        self.result.page_count
    }
}

/// Pagination state for a live preview: measures, paginates and memoizes
pub struct Paginator {
    config: PageBreakConfig,
    selectors: RoleSelectors,
    /// Last pass keyed by a hash of its block snapshot and config
    cached: Option<(u64, Pagination)>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PageBreakConfig::default())
    }
}

impl Paginator {
    pub fn new(config: PageBreakConfig) -> Self {
        Self {
            config,
            selectors: RoleSelectors::default(),
            cached: None,
        }
    }

    pub fn with_selectors(mut self, selectors: RoleSelectors) -> Self {
        self.selectors = selectors;
        self.cached = None;
        self
    }

    pub fn config(&self) -> &PageBreakConfig {
        &self.config
    }

    pub fn selectors(&self) -> &RoleSelectors {
        &self.selectors
    }

    /// Replace the page geometry; drops the memoized pass
    pub fn set_config(&mut self, config: PageBreakConfig) {
        if self.config != config {
            self.config = config;
            self.cached = None;
        }
    }

    /// Snapshot the layout tree and paginate it.
    ///
    /// Break points are recomputed only when the snapshot differs from the
    /// previous pass.
    pub fn paginate(&mut self, root: &LayoutNode) -> &Pagination {
        let blocks = extract_blocks(root, &self.selectors);
        let total_height = root.bounds.height;
        let key = snapshot_hash(&blocks, total_height, &self.config);

        let unchanged = self.cached.as_ref().is_some_and(|(cached_key, cached)| {
            *cached_key == key && cached.total_height == total_height && cached.blocks == blocks
        });
        if unchanged {
            log::trace!("Layout snapshot unchanged, reusing page breaks");
        } else {
            self.cached = None;
        }

        let config = &self.config;
        let (_, pagination) = self.cached.get_or_insert_with(|| {
            let result = calculate_break_points(&blocks, config);
            log::debug!(
                "Paginated {} blocks into {} pages ({} warnings)",
                blocks.len(),
                result.page_count,
                result.warnings.len()
            );
            (
                key,
                Pagination {
                    blocks,
                    result,
                    total_height,
                },
            )
        });
        pagination
    }

    /// The last pass, if any
    pub fn last(&self) -> Option<&Pagination> {
        self.cached.as_ref().map(|(_, pagination)| pagination)
    }

    /// Page count of the last pass, 1 before any pass
    pub fn page_count(&self) -> usize {
        self.last().map_or(1, Pagination::page_count)
    }
}

fn snapshot_hash(blocks: &[ContentBlock], total_height: f32, config: &PageBreakConfig) -> u64 {
    let mut hasher = FxHasher::default();
    for block in blocks {
        block.id.hash(&mut hasher);
        block.block_type.hash(&mut hasher);
        block.top.to_bits().hash(&mut hasher);
        block.height.to_bits().hash(&mut hasher);
        block.can_break.hash(&mut hasher);
        block.must_keep_with_next.hash(&mut hasher);
        block.parent_id.hash(&mut hasher);
    }
    total_height.to_bits().hash(&mut hasher);
    for value in [
        config.page_height_mm,
        config.page_width_mm,
        config.margin_mm,
        config.min_section_header_space_mm,
        config.min_item_space_mm,
    ] {
        value.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(class: &str, y: f32, height: f32) -> LayoutNode {
        LayoutNode::new(Rect::new(0.0, y, 600.0, height)).with_class(class)
    }

    fn resume(item_height: f32, items: usize) -> LayoutNode {
        let mut section = node("resume-section", 0.0, 30.0 + item_height * items as f32)
            .with_child(node("section-header", 0.0, 30.0));
        for i in 0..items {
            section = section.with_child(node("section-item", 30.0 + i as f32 * item_height, item_height));
        }
        LayoutNode::new(Rect::new(0.0, 0.0, 600.0, section.bounds.height)).with_child(section)
    }

    #[test]
    fn test_paginate_single_page() {
        let mut paginator = Paginator::default();
        let pagination = paginator.paginate(&resume(100.0, 3));
        assert_eq!(pagination.page_count(), 1);
        assert_eq!(pagination.blocks.len(), 5);
        assert_eq!(pagination.slices(3.0)[0].end_y, 330.0 * 3.0);
    }

    #[test]
    fn test_paginate_multiple_pages() {
        let mut paginator = Paginator::default();
        let tree = resume(200.0, 12);
        let pagination = paginator.paginate(&tree).clone();

        assert!(pagination.page_count() >= 3);
        let slices = pagination.slices(1.0);
        assert_eq!(slices.len(), pagination.page_count());
        assert_eq!(slices.last().unwrap().end_y, tree.bounds.height);
        assert_eq!(paginator.page_count(), pagination.page_count());
    }

    #[test]
    fn test_memoized_until_config_changes() {
        let mut paginator = Paginator::default();
        let tree = resume(200.0, 12);
        let first = paginator.paginate(&tree).clone();
        let key = paginator.cached.as_ref().map(|(k, _)| *k);

        assert_eq!(paginator.paginate(&tree), &first);
        assert_eq!(paginator.cached.as_ref().map(|(k, _)| *k), key);

        paginator.set_config(PageBreakConfig {
            page_height_mm: 150.0,
            ..PageBreakConfig::default()
        });
        assert!(paginator.cached.is_none());
        assert!(paginator.paginate(&tree).page_count() > first.page_count());
    }

    #[test]
    fn test_page_count_before_any_pass() {
        let paginator = Paginator::default();
        assert_eq!(paginator.page_count(), 1);
        assert!(paginator.last().is_none());
    }

    #[test]
    fn test_stale_key_with_different_blocks_recomputes() {
        let mut paginator = Paginator::default();
        let short = resume(100.0, 3);
        let tall = resume(200.0, 12);
        paginator.paginate(&short);

        // Same key, different snapshot: the cached pass must not be reused
        let key = snapshot_hash(
            &extract_blocks(&tall, paginator.selectors()),
            tall.bounds.height,
            paginator.config(),
        );
        if let Some((cached_key, _)) = paginator.cached.as_mut() {
            *cached_key = key;
        }

        let pagination = paginator.paginate(&tall);
        assert!(pagination.page_count() >= 3);
        assert_eq!(pagination.total_height, tall.bounds.height);
        assert_eq!(paginator.last().map(|p| p.blocks.len()), Some(14));
    }
}
