//! PNG export for rasterized maps.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageEncoder, RgbaImage};
use rand::Rng;

use super::{rasterize_with, remap_equirectangular, ExportError, RasterOptions};
use crate::terrain::Icosahedron;
use crate::tile::Tile;

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Smallest files, slowest encode.
    pub fn best() -> Self {
        Self {
            compression: CompressionType::Best,
            ..Default::default()
        }
    }
}

/// Which images `export_map_png` writes, and how.
#[derive(Debug, Clone, Default)]
pub struct MapExportOptions {
    pub raster: RasterOptions,
    /// Also write `{name}_equirect.png` at this height (width is double).
    pub equirect_size: Option<u32>,
    /// Also write a greyscale `{name}_height.png`.
    pub height_map: bool,
    /// Also write `{name}_clouds.png`, this tile faded by elevation.
    pub cloud_map: Option<Tile>,
    pub png: PngExportOptions,
}

/// Writes an RGBA image as PNG, creating the parent directory if needed.
pub fn save_png(
    image: &RgbaImage,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ExportError::EmptyImage);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

/// Rasterizes a map and writes it as `{name}.png` in `output_dir`.
///
/// Depending on `options`, also writes the equirectangular remap, a
/// greyscale height map and a translucent cloud layer next to it. Returns the paths written, main map first.
pub fn export_map_png<R: Rng>(
    grid: &Icosahedron,
    output_dir: &Path,
    name: &str,
    options: &MapExportOptions,
    rng: &mut R,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    let image = rasterize_with(grid, &options.raster, rng)?;
    let path = output_dir.join(format!("{}.png", name));
    save_png(&image, &path, &options.png)?;
    written.push(path);

    if let Some(size) = options.equirect_size {
        let stretched = remap_equirectangular(&image, size)?;
        let path = output_dir.join(format!("{}_equirect.png", name));
        save_png(&stretched, &path, &options.png)?;
        written.push(path);
    }

    if options.height_map {
        let mut heights = grid.clone();
        heights.heights_to_tiles();
        let image = rasterize_with(&heights, &options.raster, rng)?;
        let path = output_dir.join(format!("{}_height.png", name));
        save_png(&image, &path, &options.png)?;
        written.push(path);
    }

    if let Some(cloud) = &options.cloud_map {
        let mut clouds = grid.clone();
        clouds.heights_to_transparency(cloud);
        let image = rasterize_with(&clouds, &options.raster, rng)?;
        let path = output_dir.join(format!("{}_clouds.png", name));
        save_png(&image, &path, &options.png)?;
        written.push(path);
    }

    for path in &written {
        tracing::info!(path = %path.display(), "export.png.written");
    }
    Ok(written)
}
