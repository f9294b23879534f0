//! Render output: rasterized pages assembled into a document

mod options;
mod page;
mod renderer;

pub use options::PdfRendererOptions;
pub use page::{PageImage, PagePlacement, RenderedDocument, RenderedPage};
pub use renderer::{CancelFlag, IsolatedRasterizer, PageRenderer, Rasterizer};
