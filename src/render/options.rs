//! Renderer options

use crate::error::{Error, Result};
use crate::layout::geometry::{PageBreakConfig, A4_HEIGHT_MM, A4_WIDTH_MM};
use serde::{Deserialize, Serialize};

/// Options for rasterizing page slices into an output document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PdfRendererOptions {
    /// Rasterization scale (device pixels per layout pixel)
    pub scale: f32,
    #[serde(alias = "pageWidth")]
    pub page_width_mm: f32,
    #[serde(alias = "pageHeight")]
    pub page_height_mm: f32,
    #[serde(alias = "margin")]
    pub margin_mm: f32,
}

impl Default for PdfRendererOptions {
    fn default() -> Self {
        Self {
            scale: 3.0,
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: 12.0,
        }
    }
}

impl PdfRendererOptions {
    /// Match the page geometry used for pagination
    pub fn from_config(config: &PageBreakConfig) -> Self {
        Self {
            page_width_mm: config.page_width_mm,
            page_height_mm: config.page_height_mm,
            margin_mm: config.margin_mm,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Printable width between the side margins
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    /// Reject scales that cannot produce a page image
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "rasterization scale must be positive, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}
