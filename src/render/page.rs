//! Rasterized pages and their placement in the output document

use crate::render::PdfRendererOptions;

/// RGBA bitmap captured for one page slice
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PageImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self { width, height, rgba }
    }

    /// Height over width, 0 for an empty image
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 {
            0.0
        } else {
            self.height as f32 / self.width as f32
        }
    }
}

/// Where a page image is painted on its physical page, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub page_index: usize,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PagePlacement {
    /// Image spans the content width starting at the margin, height kept to aspect
    pub fn for_image(page_index: usize, image: &PageImage, options: &PdfRendererOptions) -> Self {
        let width_mm = options.content_width_mm();
        Self {
            page_index,
            x_mm: options.margin_mm,
            y_mm: options.margin_mm,
            width_mm,
            height_mm: width_mm * image.aspect_ratio(),
        }
    }
}

/// A page ready for the document-assembly library
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub placement: PagePlacement,
    pub image: PageImage,
}

/// Every page in slice order, with the physical page size
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub pages: Vec<RenderedPage>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
