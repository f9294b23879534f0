//! Flat buffer protocol for zero-copy WASM bridge
//!
//! Binary format for pagination data:
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x52504753 = "RPGS" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 2)
//! [2]     page_count
//! [3]     warning_count
//! [4]     block_count
//! [5..]   per-block: [id_lo, id_hi, block_type, flags, page_index]
//!           flags: bit0=can_break, bit1=must_keep_with_next, bit2=has_parent
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! [0]     total_height
//! [1]     scale
//! Per-slice: [start_y, end_y]          (page_count times)
//! Per-block: [top, height]             (block_count times)
//! ```
//!
//! Slices come first in the f32 buffer so a page-only consumer can stop
//! reading after `2 + page_count * F32_PER_SLICE` values.

use crate::document::{BlockType, ContentBlock};
use crate::layout::PageSlice;
use crate::Pagination;

/// Magic number for format validation: "RPGS" (Resume PaGeS)
pub const MAGIC: u32 = 0x52504753;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 2;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 5;

/// Header size in f32 elements
pub const F32_HEADER_SIZE: usize = 2;

/// Opcodes for block types
pub const BLOCK_SECTION: u32 = 0;
pub const BLOCK_SECTION_HEADER: u32 = 1;
pub const BLOCK_SECTION_ITEM: u32 = 2;
pub const BLOCK_SKILL_GROUP: u32 = 3;
pub const BLOCK_HIGHLIGHT_ITEM: u32 = 4;

/// Flags bitmask
pub const FLAG_CAN_BREAK: u32 = 0b001;
pub const FLAG_KEEP_WITH_NEXT: u32 = 0b010;
pub const FLAG_HAS_PARENT: u32 = 0b100;

/// Number of u32 values per block: [id_lo, id_hi, block_type, flags, page_index]
pub const U32_PER_BLOCK: usize = 5;

/// Number of f32 values per slice: [start_y, end_y]
pub const F32_PER_SLICE: usize = 2;

/// Number of f32 values per block: [top, height]
pub const F32_PER_BLOCK: usize = 2;

/// Pagination buffer for zero-copy WASM transfer
pub struct SliceBuffer {
    /// Integer data (header, block records)
    pub u32_data: Vec<u32>,
    /// Float data (slice and block geometry)
    pub f32_data: Vec<f32>,

    // Blocks are staged and written after all slices in finalize()
    pending_blocks: Vec<(ContentBlock, usize)>,
}

impl Default for SliceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SliceBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(256),
            f32_data: Vec::with_capacity(256),
            pending_blocks: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
        self.pending_blocks.clear();
    }

    /// Pre-allocate so JS-held pointers stay valid while the buffer is filled
    pub fn prepare(&mut self, page_count: usize, block_count: usize) {
        let u32_needed = HEADER_SIZE + block_count * U32_PER_BLOCK;
        let f32_needed = F32_HEADER_SIZE + page_count * F32_PER_SLICE + block_count * F32_PER_BLOCK;

        self.clear();
        self.u32_data.reserve(u32_needed);
        self.f32_data.reserve(f32_needed);
    }

    /// Write headers; counts are synchronized in finalize()
    pub fn write_header(&mut self, total_height: f32, scale: f32) {
        self.u32_data.push(MAGIC); // [0] magic number
        self.u32_data.push(SCHEMA_VERSION); // [1] schema version
        self.u32_data.push(0); // [2] page_count (placeholder)
        self.u32_data.push(0); // [3] warning_count (placeholder)
        self.u32_data.push(0); // [4] block_count (placeholder)

        self.f32_data.push(total_height);
        self.f32_data.push(scale);
    }

    pub fn write_slice(&mut self, slice: &PageSlice) {
        self.f32_data.push(slice.start_y);
        self.f32_data.push(slice.end_y);
    }

    pub fn write_block(&mut self, block: &ContentBlock, page_index: usize) {
        self.pending_blocks.push((block.clone(), page_index));
    }

    /// Write staged blocks and synchronize the header counts
    pub fn finalize(&mut self, warning_count: usize) {
        if self.u32_data.len() < HEADER_SIZE || self.f32_data.len() < F32_HEADER_SIZE {
            return;
        }

        let page_count = (self.f32_data.len() - F32_HEADER_SIZE) / F32_PER_SLICE;

        for (block, page_index) in self.pending_blocks.drain(..) {
            // 64-bit id split into two words, low first
            self.u32_data.push(block.id.0 as u32);
            self.u32_data.push((block.id.0 >> 32) as u32);
            self.u32_data.push(block_type_to_opcode(block.block_type));
            self.u32_data.push(block_flags(&block));
            self.u32_data.push(page_index as u32);

            self.f32_data.push(block.top);
            self.f32_data.push(block.height);
        }

        self.u32_data[2] = page_count as u32;
        self.u32_data[3] = warning_count as u32;
        self.u32_data[4] = ((self.u32_data.len() - HEADER_SIZE) / U32_PER_BLOCK) as u32;

        #[cfg(debug_assertions)]
        self.validate_lengths();
    }

    /// Validate that both buffers agree on the counts (debug builds only)
    #[cfg(debug_assertions)]
    fn validate_lengths(&self) {
        let page_count = self.u32_data[2] as usize;
        let block_count = self.u32_data[4] as usize;

        debug_assert_eq!(
            self.u32_data.len(),
            HEADER_SIZE + block_count * U32_PER_BLOCK,
            "u32 buffer length does not match block count"
        );
        debug_assert_eq!(
            self.f32_data.len(),
            F32_HEADER_SIZE + page_count * F32_PER_SLICE + block_count * F32_PER_BLOCK,
            "f32 buffer length does not match page and block counts"
        );
    }

    /// Fill the buffer from a pagination pass
    pub fn fill(&mut self, pagination: &Pagination, scale: f32) {
        let slices = pagination.slices(scale);
        self.prepare(slices.len(), pagination.blocks.len());
        self.write_header(pagination.total_height, scale);

        for slice in &slices {
            self.write_slice(slice);
        }
        for block in &pagination.blocks {
            self.write_block(block, pagination.result.page_of(block.top));
        }

        self.finalize(pagination.result.warnings.len());
    }

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn f32_ptr(&self) -> u32 {
        self.f32_data.as_ptr() as u32
    }

    pub fn f32_len(&self) -> u32 {
        self.f32_data.len() as u32
    }
}

/// Convert BlockType to block type opcode
pub fn block_type_to_opcode(block_type: BlockType) -> u32 {
    match block_type {
        BlockType::Section => BLOCK_SECTION,
        BlockType::SectionHeader => BLOCK_SECTION_HEADER,
        BlockType::SectionItem => BLOCK_SECTION_ITEM,
        BlockType::SkillGroup => BLOCK_SKILL_GROUP,
        BlockType::HighlightItem => BLOCK_HIGHLIGHT_ITEM,
    }
}

fn block_flags(block: &ContentBlock) -> u32 {
    let mut flags = 0;
    if block.can_break {
        flags |= FLAG_CAN_BREAK;
    }
    if block.must_keep_with_next {
        flags |= FLAG_KEEP_WITH_NEXT;
    }
    if block.parent_id.is_some() {
        flags |= FLAG_HAS_PARENT;
    }
    flags
}
