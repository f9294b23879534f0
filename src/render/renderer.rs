//! Page renderer: rasterizes each slice and assembles pages in slice order

use crate::error::{Error, Result};
use crate::layout::{calculate_page_slices, PageBreakResult, PageSlice};
use crate::render::{PageImage, PagePlacement, PdfRendererOptions, RenderedDocument, RenderedPage};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Captures page slices from a single shared surface.
///
/// The surface is repositioned for every capture, so calls must not overlap.
pub trait Rasterizer {
    fn rasterize(
        &mut self,
        page_index: usize,
        slice: &PageSlice,
        options: &PdfRendererOptions,
    ) -> Result<PageImage>;
}

/// Captures page slices from independent surfaces; safe to call concurrently
pub trait IsolatedRasterizer: Sync {
    fn rasterize(
        &self,
        page_index: usize,
        slice: &PageSlice,
        options: &PdfRendererOptions,
    ) -> Result<PageImage>;
}

/// Caller-owned cancellation signal, polled before each page
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Turns page slices into a multi-page document
#[derive(Debug, Clone, Default)]
pub struct PageRenderer {
    options: PdfRendererOptions,
}

impl PageRenderer {
    pub fn new(options: PdfRendererOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PdfRendererOptions {
        &self.options
    }

    /// Slices of the scaled surface for a pagination result
    pub fn slices_for(&self, result: &PageBreakResult, total_height: f32) -> Vec<PageSlice> {
        calculate_page_slices(&result.break_points, total_height, self.options.scale)
    }

    /// Render pages one after another on a shared surface.
    ///
    /// Any failure or cancellation discards the pages rendered so far.
    pub fn render<R: Rasterizer>(
        &self,
        slices: &[PageSlice],
        rasterizer: &mut R,
        cancel: &CancelFlag,
    ) -> Result<RenderedDocument> {
        let mut pages = Vec::with_capacity(slices.len());

        for (page_index, slice) in slices.iter().enumerate() {
            if cancel.is_cancelled() {
                log::debug!("Render cancelled at page {}", page_index);
                return Err(Error::Cancelled {
                    completed: page_index,
                    total: slices.len(),
                });
            }

            let image = rasterizer.rasterize(page_index, slice, &self.options)?;
            pages.push(self.place(page_index, image));
        }

        log::debug!("Rendered {} pages sequentially", pages.len());
        Ok(self.assemble(pages))
    }

    /// Render pages concurrently on isolated surfaces.
    ///
    /// Execution order is unspecified; pages are still assembled by index.
    pub fn render_parallel<R: IsolatedRasterizer>(
        &self,
        slices: &[PageSlice],
        rasterizer: &R,
        cancel: &CancelFlag,
    ) -> Result<RenderedDocument> {
        let completed = AtomicUsize::new(0);

        let pages = slices
            .par_iter()
            .enumerate()
            .map(|(page_index, slice)| {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled {
                        completed: completed.load(Ordering::Relaxed),
                        total: slices.len(),
                    });
                }
                let image = rasterizer.rasterize(page_index, slice, &self.options)?;
                completed.fetch_add(1, Ordering::Relaxed);
                Ok(self.place(page_index, image))
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Rendered {} pages in parallel", pages.len());
        Ok(self.assemble(pages))
    }

    fn place(&self, page_index: usize, image: PageImage) -> RenderedPage {
        RenderedPage {
            placement: PagePlacement::for_image(page_index, &image, &self.options),
            image,
        }
    }

    fn assemble(&self, pages: Vec<RenderedPage>) -> RenderedDocument {
        RenderedDocument {
            page_width_mm: self.options.page_width_mm,
            page_height_mm: self.options.page_height_mm,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Encodes the slice start into the image height so order is observable
    struct SurfaceStub {
        captured: Vec<usize>,
        fail_at: Option<usize>,
    }

    impl Rasterizer for SurfaceStub {
        fn rasterize(
            &mut self,
            page_index: usize,
            slice: &PageSlice,
            _options: &PdfRendererOptions,
        ) -> Result<PageImage> {
            if self.fail_at == Some(page_index) {
                return Err(Error::Rasterize {
                    page: page_index,
                    reason: "canvas too large".to_string(),
                });
            }
            self.captured.push(page_index);
            Ok(PageImage::new(100, slice.height() as u32, Vec::new()))
        }
    }

    struct IsolatedStub {
        calls: Mutex<Vec<usize>>,
    }

    impl IsolatedRasterizer for IsolatedStub {
        fn rasterize(
            &self,
            page_index: usize,
            slice: &PageSlice,
            _options: &PdfRendererOptions,
        ) -> Result<PageImage> {
            self.calls.lock().unwrap().push(page_index);
            Ok(PageImage::new(100, slice.start_y as u32, Vec::new()))
        }
    }

    fn slices() -> Vec<PageSlice> {
        calculate_page_slices(&[0.0, 100.0, 250.0, 400.0], 500.0, 1.0)
    }

    #[test]
    fn test_sequential_render() {
        let renderer = PageRenderer::default();
        let mut surface = SurfaceStub {
            captured: Vec::new(),
            fail_at: None,
        };
        let doc = renderer
            .render(&slices(), &mut surface, &CancelFlag::new())
            .unwrap();

        assert_eq!(surface.captured, vec![0, 1, 2, 3]);
        assert_eq!(doc.page_count(), 4);
        assert_eq!(doc.page_width_mm, 210.0);
        assert_eq!(doc.pages[1].image.height, 150);
        assert_eq!(doc.pages[1].placement.page_index, 1);
    }

    #[test]
    fn test_failure_discards_partial_document() {
        let renderer = PageRenderer::default();
        let mut surface = SurfaceStub {
            captured: Vec::new(),
            fail_at: Some(2),
        };
        let err = renderer
            .render(&slices(), &mut surface, &CancelFlag::new())
            .unwrap_err();
        assert!(matches!(err, Error::Rasterize { page: 2, .. }));
    }

    #[test]
    fn test_cancelled_render() {
        let renderer = PageRenderer::default();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut surface = SurfaceStub {
            captured: Vec::new(),
            fail_at: None,
        };
        let err = renderer.render(&slices(), &mut surface, &cancel).unwrap_err();
        assert!(matches!(
            err,
            Error::Cancelled {
                completed: 0,
                total: 4
            }
        ));
        assert!(surface.captured.is_empty());
    }

    #[test]
    fn test_parallel_render_keeps_slice_order() {
        let renderer = PageRenderer::default();
        let stub = IsolatedStub {
            calls: Mutex::new(Vec::new()),
        };
        let doc = renderer
            .render_parallel(&slices(), &stub, &CancelFlag::new())
            .unwrap();

        let starts: Vec<_> = doc.pages.iter().map(|p| p.image.height).collect();
        assert_eq!(starts, vec![0, 100, 250, 400]);
        let indices: Vec<_> = doc.pages.iter().map(|p| p.placement.page_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(stub.calls.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_slices_for_result() {
        let renderer = PageRenderer::new(PdfRendererOptions::default());
        let result = PageBreakResult {
            break_points: vec![0.0, 1000.0],
            page_count: 2,
            warnings: Vec::new(),
        };
        let slices = renderer.slices_for(&result, 1500.0);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].start_y, 3000.0);
        assert_eq!(slices[1].end_y, 4500.0);
    }
}
