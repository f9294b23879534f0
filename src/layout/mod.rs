//! Pagination: page geometry, break-point calculation and page slicing

pub mod geometry;
mod pagination;
mod slice;

pub use geometry::{mm_to_px, px_to_mm, PageBreakConfig, BOTTOM_SAFE_MARGIN_MM, PX_PER_MM};
pub use pagination::{calculate_break_points, PageBreakResult};
pub use slice::{calculate_page_slices, PageSlice};
