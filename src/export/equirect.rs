//! Equirectangular remap of a rasterized map.
//!
//! Stretches every scanline of the ragged triangle projection to the full
//! image width, giving a seamless texture for wrapping around a sphere.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use rayon::prelude::*;

use super::raster::BACKGROUND;
use super::ExportError;

const BLACK: [u8; 3] = [0, 0, 0];

#[inline]
fn is_background(p: &[u8]) -> bool {
    p[..3] == BACKGROUND.0[..3]
}

/// Remaps a rasterized map into a `2 * size` by `size` rectangle.
///
/// The rightmost eleventh of the map is first moved onto the left edge to
/// undo the slant of the unfolded icosahedron. Each scanline's map pixels
/// are then spread evenly across the whole row, and the result is scaled
/// down with nearest-neighbour sampling.
pub fn remap_equirectangular(image: &RgbaImage, size: u32) -> Result<RgbaImage, ExportError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage);
    }
    if size == 0 {
        return Err(ExportError::InvalidSize(size));
    }

    let mut buf = image.clone();
    shift_right_edge(&mut buf);

    let stride = width as usize * 4;
    let raw: &mut [u8] = &mut buf;
    raw.par_chunks_mut(stride).for_each(stretch_row);

    tracing::debug!(width, height, size, "export.equirect.remapped");
    Ok(imageops::resize(&buf, size * 2, size, FilterType::Nearest))
}

fn shift_right_edge(img: &mut RgbaImage) {
    let (width, height) = img.dimensions();
    let shift = width / 11;
    let right = width - shift;
    for y in 0..height {
        for x in 0..shift {
            let p = *img.get_pixel(right + x, y);
            if !is_background(&p.0) {
                img.put_pixel(x, y, p);
                img.put_pixel(right + x, y, BACKGROUND);
            }
        }
    }
}

/// Spreads one row's map pixels over its full width.
fn stretch_row(row: &mut [u8]) {
    let width = row.len() / 4;
    let pixels: Vec<[u8; 4]> = row
        .chunks_exact(4)
        .filter(|p| !is_background(p) && p[..3] != BLACK)
        .map(|p| [p[0], p[1], p[2], p[3]])
        .collect();

    let Some(&last) = pixels.last() else {
        for p in row.chunks_exact_mut(4) {
            p.copy_from_slice(&BACKGROUND.0);
        }
        return;
    };

    let stretch = width as f64 / pixels.len() as f64;
    let mut total = 0.0;
    let mut x = 0;
    for p in &pixels {
        total += stretch;
        let n = total as usize;
        total -= n as f64;
        for _ in 0..n {
            if x >= width {
                break;
            }
            row[x * 4..x * 4 + 4].copy_from_slice(p);
            x += 1;
        }
    }
    while x < width {
        row[x * 4..x * 4 + 4].copy_from_slice(&last);
        x += 1;
    }
}
