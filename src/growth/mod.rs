//! Terrain growth over an icosahedral map.
//!
//! Flood and border passes judge cells against the map as it stood when the
//! pass began, so a tile converted during a pass never seeds further growth
//! in the same pass.
//! Tiles are matched by kind, so shaded variants of a tile still count.

mod border;
mod craters;
mod flood;

pub use border::grow_border;
pub use craters::{
    add_rift, crater_cell, large_crater, medium_crater, scatter_craters, small_crater,
    CRATER_HEIGHT,
};
pub use flood::{flood, flood_to_percentage};

use crate::geometry::Cell;
use crate::terrain::Icosahedron;

/// One of the three edge neighbours, chosen by a `d3` roll.
///
/// `None` when the `up_down` step falls outside the grid.
fn neighbor_for_roll(grid: &Icosahedron, cell: Cell, roll: u32) -> Option<Cell> {
    let next = match roll {
        1 => Some(grid.west(cell)),
        2 => Some(grid.east(cell)),
        _ => grid.up_down(cell),
    };
    if next.is_none() {
        tracing::trace!(x = cell.x, y = cell.y, "growth.neighbor.skipped");
    }
    next
}
