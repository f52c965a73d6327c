//! Deterministic border growth.

use crate::geometry::GridError;
use crate::terrain::Icosahedron;
use crate::tile::Tile;

/// Thickens regions of `tile` by `thickness` cells.
///
/// Each pass converts every other cell that has at least `neighbors` of its
/// three edge neighbours holding `tile`. Neighbours are judged against the
/// map as it stood at the start of the pass, so one pass grows one ring.
pub fn grow_border(
    grid: &mut Icosahedron,
    tile: &Tile,
    neighbors: u32,
    thickness: u32,
) -> Result<(), GridError> {
    if !(1..=3).contains(&neighbors) {
        return Err(GridError::InvalidNeighborThreshold(neighbors));
    }

    for _ in 0..thickness {
        let snapshot: Vec<bool> = grid.tiles().iter().map(|t| t.same_kind(tile)).collect();
        let topology = grid.shared_topology();
        let was_kind = |cell| snapshot[topology.index(cell)];

        let mut converted = Vec::new();
        for cell in topology.cells().filter(|&cell| !was_kind(cell)) {
            let Some(across) = topology.up_down(cell) else {
                tracing::trace!(x = cell.x, y = cell.y, "growth.border.skipped");
                continue;
            };
            let count = [topology.west(cell), topology.east(cell), across]
                .into_iter()
                .filter(|&n| was_kind(n))
                .count() as u32;
            if count >= neighbors {
                converted.push(cell);
            }
        }

        for cell in converted {
            grid.set_tile_at(cell, tile.clone());
        }
    }
    Ok(())
}
