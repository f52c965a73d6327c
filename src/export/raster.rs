//! Rasterization of an icosahedral map into a flat triangle image.

use image::{Rgba, RgbaImage};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::draw;
use super::ExportError;
use crate::dice::Dice;
use crate::terrain::Icosahedron;
use crate::tile::{Tile, TileDetail};

/// Fully transparent white; marks pixels outside the map.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 0]);

const ROOT3: f64 = 1.732_050_807_568_877_2;

/// Options for rasterizing a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterOptions {
    /// Requested image width in pixels. The actual width is rounded down to
    /// fit a whole number of pixels per cell.
    pub width: u32,
    /// Draw surface detail (craters, rough ground) on top of each cell.
    pub details: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width: 2048,
            details: true,
        }
    }
}

impl RasterOptions {
    pub fn with_width(width: u32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }
}

/// Pixel geometry of a rasterized map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterLayout {
    /// Half the base width of one triangle, in pixels.
    pub tile_px: u32,
    /// Largest global column of any cell.
    pub max_columns: u32,
    pub width: u32,
    pub height: u32,
}

impl RasterLayout {
    /// Fits the map into `target_width` pixels.
    pub fn new(grid: &Icosahedron, target_width: u32) -> Result<Self, ExportError> {
        let max_columns = grid.topology().max_global_x() as u32;
        let tile_px = target_width / max_columns.max(1);
        if tile_px == 0 {
            return Err(ExportError::WidthTooSmall {
                requested: target_width,
                minimum: max_columns,
            });
        }
        Ok(Self {
            tile_px,
            max_columns,
            width: tile_px * (max_columns + 1),
            height: (grid.num_rows() as f64 * tile_px as f64 * ROOT3) as u32,
        })
    }

    /// Height of one row of triangles, in pixels.
    pub fn row_height(&self) -> f64 {
        self.tile_px as f64 * ROOT3
    }
}

/// Rasterizes `grid` at roughly `target_width` pixels wide.
pub fn rasterize<R: Rng>(
    grid: &Icosahedron,
    target_width: u32,
    rng: &mut R,
) -> Result<RgbaImage, ExportError> {
    rasterize_with(grid, &RasterOptions::with_width(target_width), rng)
}

/// Rasterizes `grid` as one triangle per cell.
///
/// Each triangle is filled and outlined in its tile's jittered colour and
/// then given its detail overlay. Pixels outside the map stay `BACKGROUND`.
pub fn rasterize_with<R: Rng>(
    grid: &Icosahedron,
    options: &RasterOptions,
    rng: &mut R,
) -> Result<RgbaImage, ExportError> {
    let layout = RasterLayout::new(grid, options.width)?;
    let mut img = RgbaImage::from_pixel(layout.width, layout.height, BACKGROUND);

    let tile_px = layout.tile_px as i32;
    let row_height = layout.row_height();
    let top = row_height as i32;
    let topo = grid.topology();

    for cell in grid.cells() {
        let dir = topo.orientation(cell).sign() as i32;
        let px = (topo.global_x(cell) as i32 - 1) * tile_px;
        let mut py = (cell.y as f64 * row_height) as i32;
        if dir > 0 {
            py = (py as f64 - row_height) as i32;
        }
        let py = py + top;
        let h = (row_height * dir as f64) as i32;

        let tile = grid.tile_at(cell);
        let colour = tile.jittered_rgba(rng);
        draw::fill_triangle(&mut img, px, py, tile_px, h, colour);
        draw::triangle(&mut img, px, py, tile_px, h, colour);
        if options.details {
            add_detail(&mut img, tile, px, py, tile_px, h, rng);
        }
    }

    tracing::debug!(
        width = layout.width,
        height = layout.height,
        tile_px = layout.tile_px,
        "export.rasterized"
    );
    Ok(img)
}

fn add_detail<R: Rng>(
    img: &mut RgbaImage,
    tile: &Tile,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    rng: &mut R,
) {
    match tile.detail() {
        TileDetail::Plain => {}
        TileDetail::Cratered => draw_craters(img, tile, x, y, w, h, rng),
        TileDetail::Rough => draw_rough(img, tile, x, y, w, h, rng),
    }
}

fn shifted(tile: &Tile, factor: f64) -> Rgba<u8> {
    let [r, g, b] = tile.shifted_rgb(factor);
    Rgba([r, g, b, tile.opacity()])
}

/// One to three small craters: lighter rims, darker floors.
fn draw_craters<R: Rng>(
    img: &mut RgbaImage,
    tile: &Tile,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    rng: &mut R,
) {
    let floor = shifted(tile, 0.85);
    let walls = shifted(tile, 1.1);
    let var = (w / 5).max(2) as u32;
    let count = match rng.d6() {
        1..=3 => 1,
        4 | 5 => 2,
        _ => 3,
    };

    let craters: Vec<(i32, i32, i32)> = (0..count)
        .map(|_| {
            let r = w / 4 + rng.die_v(var);
            let cx = x + w + rng.die_v(var + count / 2);
            let cy = y + h / 2 + rng.die_v(var + count / 2);
            (cx, cy, r)
        })
        .collect();

    // Rims first, so overlapping floors cut through them.
    for &(cx, cy, r) in &craters {
        draw::circle(img, cx, cy, r, walls);
    }
    for &(cx, cy, r) in &craters {
        draw::fill_circle(img, cx, cy, r - 1, floor);
    }
}

/// Dapples the whole triangle with light and dark dots.
fn draw_rough<R: Rng>(
    img: &mut RgbaImage,
    tile: &Tile,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    rng: &mut R,
) {
    let dark = shifted(tile, 0.9);
    let light = shifted(tile, 1.1);
    let base = tile.rgba();
    let height = h.abs();
    for row in 0..height {
        let half = w * (height - row) / height;
        for dx in -half..half {
            let colour = match rng.d3() {
                1 => dark,
                2 => light,
                _ => base,
            };
            draw::dot(img, x + dx + w, y + h.signum() * row, colour);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Cell;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_layout() {
        let grid = Icosahedron::new(3).unwrap();
        let layout = RasterLayout::new(&grid, 330).unwrap();
        assert_eq!(layout.max_columns, 32);
        assert_eq!(layout.tile_px, 10);
        assert_eq!(layout.width, 330);
        assert_eq!(layout.height, (9.0 * 10.0 * ROOT3) as u32);
    }

    #[test]
    fn test_width_rounds_down() {
        let grid = Icosahedron::new(3).unwrap();
        let layout = RasterLayout::new(&grid, 340).unwrap();
        assert_eq!(layout.width, 330);
    }

    #[test]
    fn test_width_too_small() {
        let grid = Icosahedron::new(3).unwrap();
        assert!(matches!(
            RasterLayout::new(&grid, 31),
            Err(ExportError::WidthTooSmall { requested: 31, minimum: 32 })
        ));
    }

    #[test]
    fn test_rasterize_paints_map() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let grid = Icosahedron::new(3).unwrap();
        let img = rasterize(&grid, 330, &mut rng).unwrap();
        assert_eq!(img.width(), 330);

        let painted = img.pixels().filter(|p| **p != BACKGROUND).count();
        let total = (img.width() * img.height()) as usize;
        assert!(painted > total / 2, "{} of {}", painted, total);
        // The top-left corner lies outside the northern cap.
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
        // No tile ever paints pure white or pure black.
        for p in img.pixels().filter(|p| **p != BACKGROUND) {
            assert!(p.0[..3] != [255, 255, 255] && p.0[..3] != [0, 0, 0]);
        }
    }

    #[test]
    fn test_rasterize_uses_tile_colour() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut grid = Icosahedron::new(3).unwrap();
        let red = Tile::new("Red", [200, 20, 20], false).with_jitter(0);
        let cells: Vec<_> = grid.cells().collect();
        for cell in cells {
            grid.set_tile_at(cell, red.clone());
        }
        let img = rasterize(&grid, 330, &mut rng).unwrap();
        let centre = img.get_pixel(img.width() / 2, img.height() / 2);
        assert_eq!(*centre, Rgba([200, 20, 20, 255]));
    }

    #[test]
    fn test_details_stay_near_tile() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut grid = Icosahedron::new(3).unwrap();
        let rock = Tile::new("Rock", [100, 100, 100], false).with_jitter(0);
        grid.set_tile_at(Cell::new(10, 4), rock.cratered());
        grid.set_tile_at(Cell::new(20, 4), rock.rough());
        let img = rasterize(&grid, 660, &mut rng).unwrap();

        let shaded = img
            .pixels()
            .filter(|p| matches!(p.0, [85, 85, 85, 255] | [90, 90, 90, 255] | [110, 110, 110, 255]))
            .count();
        assert!(shaded > 0);
    }

    #[test]
    fn test_rasterize_reproducible() {
        let grid = Icosahedron::new(3).unwrap();
        let a = rasterize(&grid, 200, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let b = rasterize(&grid, 200, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }
}
