//! The mutable map: a topology plus one tile and one elevation per cell.

use std::sync::Arc;

use serde::Serialize;

use crate::geometry::{Cell, GridError, GridTopology};
use crate::tile::Tile;

/// Elevation every cell starts at.
pub const DEFAULT_HEIGHT: u8 = 50;
/// Lowest storable elevation.
pub const MIN_HEIGHT: u8 = 1;
/// Highest storable elevation.
pub const MAX_HEIGHT: u8 = 100;

/// An icosahedral map of tiles and elevations.
///
/// The topology is shared between maps of the same face size, so building
/// many maps at one resolution only pays for the per-cell buffers.
#[derive(Debug, Clone, Serialize)]
pub struct Icosahedron {
    topology: Arc<GridTopology>,
    tiles: Vec<Tile>,
    heights: Vec<u8>,
}

impl Icosahedron {
    /// Creates a grey, flat map with faces `face_size` rows tall.
    pub fn new(face_size: usize) -> Result<Self, GridError> {
        Ok(Self::with_topology(Arc::new(GridTopology::new(face_size)?)))
    }

    /// Creates a grey, flat map over an existing topology.
    pub fn with_topology(topology: Arc<GridTopology>) -> Self {
        let count = topology.cell_count();
        Self {
            topology,
            tiles: vec![Tile::default(); count],
            heights: vec![DEFAULT_HEIGHT; count],
        }
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    /// A shared handle to this map's topology.
    pub fn shared_topology(&self) -> Arc<GridTopology> {
        Arc::clone(&self.topology)
    }

    pub fn face_size(&self) -> usize {
        self.topology.face_size()
    }

    pub fn num_rows(&self) -> usize {
        self.topology.num_rows()
    }

    /// Number of cells in row `y`; errors outside `0..num_rows`.
    pub fn row_width(&self, y: usize) -> Result<usize, GridError> {
        self.topology.row_width(y)
    }

    pub fn cell_count(&self) -> usize {
        self.topology.cell_count()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.topology.cells()
    }

    /// Maps loose coordinates onto a cell (rows clamp, columns wrap).
    pub fn normalize(&self, x: isize, y: isize) -> Cell {
        self.topology.normalize(x, y)
    }

    pub fn tile_at(&self, cell: Cell) -> &Tile {
        &self.tiles[self.topology.index(cell)]
    }

    pub fn set_tile_at(&mut self, cell: Cell, tile: Tile) {
        let i = self.topology.index(cell);
        self.tiles[i] = tile;
    }

    pub fn height_at(&self, cell: Cell) -> u8 {
        self.heights[self.topology.index(cell)]
    }

    /// Writes an elevation, clamped to `MIN_HEIGHT..=MAX_HEIGHT`.
    pub fn set_height_at(&mut self, cell: Cell, height: i32) {
        let i = self.topology.index(cell);
        self.heights[i] = height.clamp(MIN_HEIGHT as i32, MAX_HEIGHT as i32) as u8;
    }

    /// Tile at loose coordinates.
    pub fn tile(&self, x: isize, y: isize) -> &Tile {
        self.tile_at(self.normalize(x, y))
    }

    /// Sets the tile at loose coordinates.
    pub fn set_tile(&mut self, x: isize, y: isize, tile: Tile) {
        let cell = self.normalize(x, y);
        self.set_tile_at(cell, tile);
    }

    /// Elevation at loose coordinates.
    pub fn height(&self, x: isize, y: isize) -> u8 {
        self.height_at(self.normalize(x, y))
    }

    /// Sets the elevation at loose coordinates, clamped.
    pub fn set_height(&mut self, x: isize, y: isize, height: i32) {
        let cell = self.normalize(x, y);
        self.set_height_at(cell, height);
    }

    /// All tiles, row by row.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// All elevations, row by row.
    pub fn heights(&self) -> &[u8] {
        &self.heights
    }

    pub fn west(&self, cell: Cell) -> Cell {
        self.topology.west(cell)
    }

    pub fn east(&self, cell: Cell) -> Cell {
        self.topology.east(cell)
    }

    pub fn up_down(&self, cell: Cell) -> Option<Cell> {
        self.topology.up_down(cell)
    }

    pub fn opposite(&self, cell: Cell) -> Option<Cell> {
        self.topology.opposite(cell)
    }

    /// Copies every elevation from a map with the same number of rows.
    pub fn copy_heights_from(&mut self, other: &Icosahedron) -> Result<(), GridError> {
        if other.num_rows() != self.num_rows() {
            return Err(GridError::SizeMismatch {
                expected: self.num_rows(),
                found: other.num_rows(),
            });
        }
        self.heights.copy_from_slice(&other.heights);
        Ok(())
    }

    /// Number of cells holding the same kind of tile as `tile`.
    pub fn count_kind(&self, tile: &Tile) -> usize {
        self.tiles.iter().filter(|t| t.same_kind(tile)).count()
    }

    /// Distance of row `y` from the equator in whole degrees, 0 to 90.
    ///
    /// Hemisphere-agnostic; only useful for distance from the poles.
    pub fn latitude(&self, y: usize) -> u32 {
        let rows = self.num_rows() as f64;
        let y = y as f64;
        let lat = if y < (self.num_rows() / 2) as f64 {
            90.0 * (1.0 - (2.0 * y) / rows)
        } else {
            90.0 * (1.0 - (2.0 * (rows - y)) / rows)
        };
        lat.abs() as u32
    }

    /// Replaces every tile with a grey whose level is twice the elevation.
    pub fn heights_to_tiles(&mut self) {
        for (tile, &h) in self.tiles.iter_mut().zip(&self.heights) {
            *tile = Tile::grey(h as i32 * 2, false);
        }
    }

    /// Replaces every tile with `base`, translucent where the map is low.
    ///
    /// Opacity is `height * 2.5`, so high ground becomes nearly opaque.
    pub fn heights_to_transparency(&mut self, base: &Tile) {
        for (tile, &h) in self.tiles.iter_mut().zip(&self.heights) {
            let opacity = (h as f64 * 2.5) as u8;
            *tile = base.clone().with_opacity(opacity).with_jitter(2);
        }
    }
}
