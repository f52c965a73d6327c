//! Random flood growth.

use rand::Rng;

use super::neighbor_for_roll;
use crate::dice::Dice;
use crate::geometry::{Cell, GridError};
use crate::terrain::Icosahedron;
use crate::tile::Tile;

/// Grows `tile` outward for `iterations` passes.
///
/// In each pass every cell holding `tile` converts one random neighbour
/// (west, east or across its base).
pub fn flood<R: Rng>(grid: &mut Icosahedron, tile: &Tile, iterations: u32, rng: &mut R) {
    for _ in 0..iterations {
        let seeds = seed_cells(grid, tile);
        for cell in seeds {
            let roll = rng.d3();
            if let Some(target) = neighbor_for_roll(grid, cell, roll) {
                grid.set_tile_at(target, tile.clone());
            }
        }
    }
}

/// Floods `tile` until it covers just over `percentage` percent of the map.
///
/// With `use_heights`, a neighbour converts only when a `d100` roll is at
/// most its elevation, so growth favours high ground. Returns the number of
/// cells holding `tile` afterwards: one more than `total * percentage / 100`
/// unless the whole map was covered first.
pub fn flood_to_percentage<R: Rng>(
    grid: &mut Icosahedron,
    tile: &Tile,
    percentage: u32,
    use_heights: bool,
    rng: &mut R,
) -> Result<usize, GridError> {
    if percentage > 100 {
        return Err(GridError::InvalidPercentage(percentage));
    }
    let total = grid.cell_count();
    let required = total * percentage as usize / 100;
    let mut flooded = grid.count_kind(tile);
    if flooded == 0 {
        return Err(GridError::NoSeedCells(tile.name().to_string()));
    }

    let mut passes = 0u32;
    while flooded <= required && flooded < total {
        let seeds = seed_cells(grid, tile);
        for cell in seeds {
            if flooded > required {
                break;
            }
            let roll = rng.d3();
            let Some(target) = neighbor_for_roll(grid, cell, roll) else {
                continue;
            };
            if use_heights && rng.d100() > grid.height_at(target) as u32 {
                continue;
            }
            if !grid.tile_at(target).same_kind(tile) {
                grid.set_tile_at(target, tile.clone());
                flooded += 1;
            }
        }
        flooded = grid.count_kind(tile);
        passes += 1;
    }

    tracing::debug!(
        tile = tile.name(),
        percentage,
        flooded,
        passes,
        "growth.flood_to_percentage"
    );
    Ok(flooded)
}

/// Cells of kind `tile` in the current map, in row order.
pub(super) fn seed_cells(grid: &Icosahedron, tile: &Tile) -> Vec<Cell> {
    grid.cells()
        .filter(|&cell| grid.tile_at(cell).same_kind(tile))
        .collect()
}
