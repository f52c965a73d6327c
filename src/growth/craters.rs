//! Crater stamping and rifts.

use rand::Rng;

use crate::dice::Dice;
use crate::geometry::Cell;
use crate::terrain::Icosahedron;
use crate::tile::Tile;

/// Elevation of a crater floor; low, but above any sea.
pub const CRATER_HEIGHT: u8 = 10;

const CRATER_SHADE: u32 = 85;

/// Turns one cell into crater floor.
///
/// Liquid tiles and cells already at crater height are left alone; anything
/// else drops to `CRATER_HEIGHT` and is shaded darker.
pub fn crater_cell(grid: &mut Icosahedron, x: isize, y: isize) {
    let cell = grid.normalize(x, y);
    let tile = grid.tile_at(cell);
    if tile.is_water() || grid.height_at(cell) == CRATER_HEIGHT {
        return;
    }
    let shaded = tile.shaded(CRATER_SHADE);
    grid.set_height_at(cell, CRATER_HEIGHT as i32);
    grid.set_tile_at(cell, shaded);
}

fn crater_line(grid: &mut Icosahedron, cell: Cell, half_width: isize) {
    let (x, y) = (cell.x as isize, cell.y as isize);
    for cx in x - half_width..=x + half_width {
        crater_cell(grid, cx, y);
    }
}

/// A single-cell crater.
pub fn small_crater(grid: &mut Icosahedron, cell: Cell) {
    crater_cell(grid, cell.x as isize, cell.y as isize);
}

/// A hexagonal crater: three cells at `cell` and three beyond its apex.
pub fn medium_crater(grid: &mut Icosahedron, cell: Cell) {
    crater_line(grid, cell, 1);
    match grid.opposite(cell) {
        Some(beyond) => crater_line(grid, beyond, 1),
        None => tracing::trace!(x = cell.x, y = cell.y, "growth.crater.medium.clipped"),
    }
}

/// A crater spanning four rows.
///
/// Lines of seven cells at `cell` and beyond its apex, and lines of five
/// across the base of each of those.
pub fn large_crater(grid: &mut Icosahedron, cell: Cell) {
    crater_line(grid, cell, 3);
    match grid.opposite(cell) {
        Some(beyond) => {
            crater_line(grid, beyond, 3);
            if let Some(outer) = grid.up_down(beyond) {
                crater_line(grid, outer, 2);
            }
        }
        None => tracing::trace!(x = cell.x, y = cell.y, "growth.crater.large.clipped"),
    }
    if let Some(across) = grid.up_down(cell) {
        crater_line(grid, across, 2);
    }
}

/// Stamps `number` craters at random away from the poles.
///
/// Crater size is `d6 + size_modifier`: 1 or less is small, 2 to 5 medium,
/// anything higher large.
pub fn scatter_craters<R: Rng>(
    grid: &mut Icosahedron,
    size_modifier: i32,
    number: u32,
    rng: &mut R,
) {
    let rows = grid.num_rows();
    let (mut small, mut medium, mut large) = (0u32, 0u32, 0u32);
    for _ in 0..number {
        let y = (rows / 5 + rng.roll_zero(rows * 3 / 5)).min(rows - 1);
        let width = grid.topology().width(y);
        let x = 2 + rng.roll_zero(width.saturating_sub(4));
        let cell = grid.normalize(x as isize, y as isize);

        match rng.d6() as i32 + size_modifier {
            i32::MIN..=1 => {
                small_crater(grid, cell);
                small += 1;
            }
            2..=5 => {
                medium_crater(grid, cell);
                medium += 1;
            }
            _ => {
                large_crater(grid, cell);
                large += 1;
            }
        }
    }
    tracing::debug!(small, medium, large, "growth.craters.scattered");
}

/// Paints a rift of `length` cells of `tile` at crater height.
///
/// The rift runs east from a random start near the equator, now and then
/// stepping back west and across a row.
pub fn add_rift<R: Rng>(grid: &mut Icosahedron, tile: &Tile, length: u32, rng: &mut R) {
    let rows = grid.num_rows();
    let y = (rows / 4 + rng.die((rows / 2) as u32) as usize).min(rows - 1);
    let x = rng.roll_zero(grid.topology().width(y));
    let mut cell = Cell::new(x, y);

    for _ in 0..length {
        if rng.d3() == 1 {
            cell = grid.west(cell);
            match grid.up_down(cell) {
                Some(across) => cell = across,
                None => tracing::trace!(x = cell.x, y = cell.y, "growth.rift.skipped"),
            }
        }
        grid.set_tile_at(cell, tile.clone());
        grid.set_height_at(cell, CRATER_HEIGHT as i32);
        cell = grid.east(cell);
    }
}
