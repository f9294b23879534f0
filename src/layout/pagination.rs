//! Break-point calculation for flowed content blocks

use crate::document::{BlockId, ContentBlock};
use crate::layout::geometry::{px_to_mm, PageBreakConfig};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Output of a pagination pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBreakResult {
    /// Flow offsets where pages start; strictly increasing, first is 0
    pub break_points: Vec<f32>,
    pub page_count: usize,
    /// Human-readable notes about content that overflows or was split
    pub warnings: Vec<String>,
}

impl Default for PageBreakResult {
    fn default() -> Self {
        Self {
            break_points: vec![0.0],
            page_count: 1,
            warnings: Vec::new(),
        }
    }
}

impl PageBreakResult {
    /// Index of the page containing flow offset `offset`
    pub fn page_of(&self, offset: f32) -> usize {
        self.break_points
            .partition_point(|&bp| bp <= offset)
            .saturating_sub(1)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// The current page as a half-open range along the flow axis
#[derive(Debug, Clone, Copy)]
struct PageWindow {
    start: f32,
    end: f32,
}

impl PageWindow {
    fn starting_at(start: f32, usable_height: f32) -> Self {
        Self {
            start,
            end: start + usable_height,
        }
    }
}

/// Thresholds derived once from the config, in pixel-equivalent units
struct Limits {
    usable_height: f32,
    bottom_safe: f32,
    header_reserve: f32,
}

type ChildIndex = FxHashMap<BlockId, SmallVec<[usize; 8]>>;

/// Compute page break offsets for `blocks` (sorted by `top`).
///
/// Single forward pass. Headings with too little room left are moved to the
/// next page before overflow is considered; overflowing blocks break at the
/// nearest earlier block start that satisfies the keep rules and does not
/// cut through an enclosing block that fits on a page. Every break point is
/// the `top` of some input block. Never fails; oversized content is reported
/// through `warnings`.
pub fn calculate_break_points(blocks: &[ContentBlock], config: &PageBreakConfig) -> PageBreakResult {
    let limits = Limits {
        usable_height: config.usable_height_px(),
        bottom_safe: config.bottom_safe_margin_px(),
        header_reserve: config.header_reserve_px(),
    };
    let children = index_children(blocks);
    let enclosed = enclosed_by_fitting_block(blocks, limits.usable_height);

    let mut break_points = vec![0.0];
    let mut warnings = Vec::new();
    let mut window = PageWindow::starting_at(0.0, limits.usable_height);

    for (index, block) in blocks.iter().enumerate() {
        // Header lookahead
        if block.block_type.is_heading()
            && block.top > window.start
            && window.end - block.top < limits.header_reserve
        {
            log::debug!(
                "Moving {} {:?} at {:.1} to a new page: {:.1}px left, {:.1}px required",
                block.block_type,
                block.id,
                block.top,
                window.end - block.top,
                limits.header_reserve
            );
            break_points.push(block.top);
            window = PageWindow::starting_at(block.top, limits.usable_height);
            continue;
        }

        if block.bottom() <= window.end {
            continue;
        }

        let break_at = match find_break_candidate(blocks, &enclosed, index, window, &limits) {
            Some(candidate) => {
                log::debug!(
                    "{} {:?} overflows page ending at {:.1}; breaking before {:?} at {:.1}",
                    block.block_type,
                    block.id,
                    window.end,
                    blocks[candidate].id,
                    blocks[candidate].top
                );
                blocks[candidate].top
            }
            None => {
                log::debug!(
                    "No break candidate after {:.1}; forcing break at {} {:?} ({:.1})",
                    window.start,
                    block.block_type,
                    block.id,
                    block.top
                );
                if block.top > window.start && separates_kept_pair(blocks, index) {
                    let message = format!(
                        "Forced page break before {} at {:.1}mm separates it from the preceding {}",
                        block.block_type,
                        px_to_mm(block.top),
                        blocks[index - 1].block_type
                    );
                    log::warn!("{}", message);
                    warnings.push(message);
                }
                block.top
            }
        };

        if break_at > window.start {
            break_points.push(break_at);
            window = PageWindow::starting_at(break_at, limits.usable_height);
        }

        if block.height > limits.usable_height {
            let message = format!(
                "Block type '{}' is {:.1}mm tall and exceeds the usable page height of {:.1}mm",
                block.block_type,
                px_to_mm(block.height),
                px_to_mm(limits.usable_height)
            );
            log::warn!("{}", message);
            warnings.push(message);

            let internal = match children.get(&block.id) {
                Some(kids) => split_oversized(blocks, kids, window.start, limits.usable_height),
                None => Vec::new(),
            };
            if let Some(&last) = internal.last() {
                log::debug!(
                    "Split oversized {} {:?} at {} internal points",
                    block.block_type,
                    block.id,
                    internal.len()
                );
                break_points.extend(internal);
                window = PageWindow::starting_at(last, limits.usable_height);
            }
        }
    }

    PageBreakResult {
        page_count: break_points.len(),
        break_points,
        warnings,
    }
}

/// Direct children of every parent, in `top` order
fn index_children(blocks: &[ContentBlock]) -> ChildIndex {
    let mut children = ChildIndex::default();
    for (index, block) in blocks.iter().enumerate() {
        if let Some(parent) = block.parent_id {
            children.entry(parent).or_default().push(index);
        }
    }
    children
}

/// For every block, whether its `top` lies strictly inside an earlier block
/// that fits on one page. Blocks sharing a `top` do not enclose each other.
fn enclosed_by_fitting_block(blocks: &[ContentBlock], usable_height: f32) -> Vec<bool> {
    let mut enclosed = Vec::with_capacity(blocks.len());
    // Furthest bottom among fitting blocks that start before the current top
    let mut reach = f32::NEG_INFINITY;
    let mut group_reach = f32::NEG_INFINITY;
    let mut group_top = f32::NAN;

    for block in blocks {
        if block.top != group_top {
            reach = reach.max(group_reach);
            group_reach = f32::NEG_INFINITY;
            group_top = block.top;
        }
        enclosed.push(reach > block.top);
        if block.height <= usable_height {
            group_reach = group_reach.max(block.bottom());
        }
    }

    enclosed
}

/// Walk back from `index` to the start of the page for the nearest block a
/// page may start at. First match wins.
fn find_break_candidate(
    blocks: &[ContentBlock],
    enclosed: &[bool],
    index: usize,
    window: PageWindow,
    limits: &Limits,
) -> Option<usize> {
    let latest_break = window.end - limits.bottom_safe;

    for j in (0..=index).rev() {
        let candidate = &blocks[j];
        // Sorted by top: nothing earlier can start after the page start
        if candidate.top <= window.start {
            break;
        }
        if !candidate.can_break || separates_kept_pair(blocks, j) || enclosed[j] {
            continue;
        }
        if candidate.top > latest_break {
            continue;
        }
        // Headings still on this page passed the lookahead, so their reserve holds
        debug_assert!(
            !candidate.block_type.is_heading() || window.end - candidate.top >= limits.header_reserve,
            "heading at {} kept without its reserve",
            candidate.top
        );
        return Some(j);
    }

    None
}

/// Whether a break before `blocks[index]` splits it from a keep-with-next predecessor
fn separates_kept_pair(blocks: &[ContentBlock], index: usize) -> bool {
    index > 0 && blocks[index - 1].must_keep_with_next
}

/// Break points inside an oversized block, taken at its breakable children
fn split_oversized(
    blocks: &[ContentBlock],
    children: &[usize],
    page_start: f32,
    usable_height: f32,
) -> Vec<f32> {
    let mut points = Vec::new();
    let mut last_break = page_start;
    let mut current_end = page_start + usable_height;

    for &child_index in children {
        let child = &blocks[child_index];
        if child.bottom() > current_end && child.can_break && child.top > last_break {
            points.push(child.top);
            last_break = child.top;
            current_end = child.top + usable_height;
        }
    }

    points
}
