//! Export module for turning maps into images.
//!
//! Rasterizes a grid into the unfolded triangle projection, remaps that to
//! an equirectangular texture, and writes either to PNG.

pub mod draw;
mod equirect;
mod png;
mod raster;

use thiserror::Error;

pub use equirect::remap_equirectangular;
pub use png::{export_map_png, save_png, MapExportOptions, PngExportOptions};
pub use raster::{rasterize, rasterize_with, RasterLayout, RasterOptions, BACKGROUND};

/// Errors that can occur while rendering or writing map images.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image width {requested} is too small, need at least {minimum} pixels")]
    WidthTooSmall { requested: u32, minimum: u32 },

    #[error("Cannot export an empty image")]
    EmptyImage,

    #[error("Invalid output size {0}")]
    InvalidSize(u32),
}
