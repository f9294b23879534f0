//! Error types for resume-pager.
//!
//! Block extraction, break-point calculation and slicing never fail; these
//! errors come from configuration loading and the page renderer.

use std::io;
use thiserror::Error;

/// Result type alias for resume-pager operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced outside the pure pagination core.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading layout snapshots or configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON input (layout tree, blocks or configuration).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Page geometry that cannot hold any content.
    #[error("Invalid page configuration: {0}")]
    InvalidConfig(String),

    /// The rasterizer failed to capture a page slice.
    #[error("Failed to rasterize page {page}: {reason}")]
    Rasterize { page: usize, reason: String },

    /// The render was cancelled by the caller; partial output is discarded.
    #[error("Render cancelled after {completed} of {total} pages")]
    Cancelled { completed: usize, total: usize },
}
