//! Page geometry and unit conversions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// CSS pixels per millimetre at 96 DPI
pub const PX_PER_MM: f32 = 96.0 / 25.4;

/// Reserve kept free at the bottom of every page
pub const BOTTOM_SAFE_MARGIN_MM: f32 = 15.0;

/// A4 portrait
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

pub fn mm_to_px(mm: f32) -> f32 {
    mm * PX_PER_MM
}

pub fn px_to_mm(px: f32) -> f32 {
    px / PX_PER_MM
}

/// Pagination configuration, all distances in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageBreakConfig {
    pub page_height_mm: f32,
    pub page_width_mm: f32,
    pub margin_mm: f32,
    /// Room a section header needs below it on the same page
    #[serde(alias = "minSectionHeaderSpace")]
    pub min_section_header_space_mm: f32,
    /// Informational only
    #[serde(alias = "minItemSpace")]
    pub min_item_space_mm: f32,
}

impl Default for PageBreakConfig {
    fn default() -> Self {
        Self {
            page_height_mm: A4_HEIGHT_MM,
            page_width_mm: A4_WIDTH_MM,
            margin_mm: 12.0,
            min_section_header_space_mm: 40.0,
            min_item_space_mm: 20.0,
        }
    }
}

impl PageBreakConfig {
    /// Content height per page in pixel-equivalent units
    pub fn usable_height_px(&self) -> f32 {
        mm_to_px(self.page_height_mm - 2.0 * self.margin_mm)
    }

    /// Content width per page in millimetres
    pub fn usable_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    pub fn bottom_safe_margin_px(&self) -> f32 {
        mm_to_px(BOTTOM_SAFE_MARGIN_MM)
    }

    /// Space a heading needs below its top before the page ends
    pub fn header_reserve_px(&self) -> f32 {
        mm_to_px(self.min_section_header_space_mm) + self.bottom_safe_margin_px()
    }

    /// Reject geometry that leaves no room for content
    pub fn validate(&self) -> Result<()> {
        if !(self.page_width_mm > 0.0 && self.page_height_mm > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "page size must be positive, got {}x{}mm",
                self.page_width_mm, self.page_height_mm
            )));
        }
        if self.margin_mm < 0.0
            || 2.0 * self.margin_mm >= self.page_height_mm
            || 2.0 * self.margin_mm >= self.page_width_mm
        {
            return Err(Error::InvalidConfig(format!(
                "margin {}mm leaves no content area on a {}x{}mm page",
                self.margin_mm, self.page_width_mm, self.page_height_mm
            )));
        }
        if self.min_section_header_space_mm < 0.0 || self.min_item_space_mm < 0.0 {
            return Err(Error::InvalidConfig(
                "minimum spaces must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
