//! Row layout of the unfolded icosahedron.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Orientation;

/// Number of gores (repeating wedges) around the unfolded icosahedron.
pub const GORES: usize = 5;

/// Errors raised by grid construction and grid-level operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid face size {0}: must be at least 1")]
    InvalidFaceSize(usize),
    #[error("Row {row} is outside bounds 0 - {max}")]
    RowOutOfRange { row: usize, max: usize },
    #[error("Grid size mismatch: expected {expected} rows, found {found}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("Parent grid ({parent_rows} rows) must be smaller than this grid ({rows} rows)")]
    ParentNotSmaller { parent_rows: usize, rows: usize },
    #[error("Neighbour threshold must be between 1 and 3, got {0}")]
    InvalidNeighborThreshold(u32),
    #[error("Percentage must be between 0 and 100, got {0}")]
    InvalidPercentage(u32),
    #[error("No '{0}' cells to grow from")]
    NoSeedCells(String),
    #[error("Face size {target} cannot be reached by doubling {base}")]
    FaceSizeNotReachable { base: usize, target: usize },
}

/// A validated cell coordinate: `y` is the row, `x` the column within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Immutable row layout derived from a face size.
///
/// Per-cell data is stored flat, row after row; `row_offsets[y] + x` is the
/// index of cell `(x, y)` in every per-cell buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridTopology {
    face_size: usize,
    row_widths: Vec<usize>,
    row_offsets: Vec<usize>,
    global_x: Vec<usize>,
    orientation: Vec<Orientation>,
}

impl GridTopology {
    /// Builds the layout for a grid whose faces are `face_size` rows tall.
    ///
    /// The grid has `face_size * 3` rows: a northern cap whose rows grow by
    /// two cells per gore, an equatorial band of constant width, and a
    /// southern cap that shrinks back to one cell per gore.
    pub fn new(face_size: usize) -> Result<Self, GridError> {
        if face_size == 0 {
            return Err(GridError::InvalidFaceSize(face_size));
        }
        let num_rows = face_size * 3;

        let mut row_widths = Vec::with_capacity(num_rows);
        let mut per_gore = 1;
        for _ in 0..face_size {
            row_widths.push(per_gore * GORES);
            per_gore += 2;
        }
        for _ in face_size..face_size * 2 {
            row_widths.push(face_size * 2 * GORES);
        }
        for _ in face_size * 2..num_rows {
            per_gore -= 2;
            row_widths.push(per_gore * GORES);
        }

        let mut row_offsets = Vec::with_capacity(num_rows);
        let mut total = 0;
        for &w in &row_widths {
            row_offsets.push(total);
            total += w;
        }

        let mut global_x = Vec::with_capacity(total);
        let mut orientation = Vec::with_capacity(total);
        for (y, &w) in row_widths.iter().enumerate() {
            let southern = y >= face_size * 2;
            for gore in 0..GORES {
                // Gore start positions; the southern formula is always >= 1.
                let start = if southern {
                    (gore + 1) * face_size * 2 + y + 1 - face_size * 4
                } else {
                    (gore + 1) * face_size * 2 - y
                };
                let mut dir = if southern { Orientation::Down } else { Orientation::Up };
                for i in 0..w / GORES {
                    global_x.push(start + i);
                    orientation.push(dir);
                    dir = dir.flipped();
                }
            }
        }

        Ok(Self {
            face_size,
            row_widths,
            row_offsets,
            global_x,
            orientation,
        })
    }

    /// Height in rows of each icosahedron face.
    pub fn face_size(&self) -> usize {
        self.face_size
    }

    /// Total number of rows, pole to pole.
    pub fn num_rows(&self) -> usize {
        self.row_widths.len()
    }

    /// Number of cells in row `y`.
    pub fn row_width(&self, y: usize) -> Result<usize, GridError> {
        self.row_widths.get(y).copied().ok_or(GridError::RowOutOfRange {
            row: y,
            max: self.num_rows() - 1,
        })
    }

    /// Row width for a row index already known to be valid.
    #[inline]
    pub(crate) fn width(&self, y: usize) -> usize {
        self.row_widths[y]
    }

    /// All row widths, north to south.
    pub fn row_widths(&self) -> &[usize] {
        &self.row_widths
    }

    /// Total number of cells in the grid (always `20 * face_size²`).
    pub fn cell_count(&self) -> usize {
        self.global_x.len()
    }

    /// Flat buffer index of a cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is not on the grid. A column past the end of its
    /// row would otherwise alias a cell on the next row.
    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        assert!(
            cell.y < self.num_rows() && cell.x < self.row_widths[cell.y],
            "cell ({}, {}) is outside the grid",
            cell.x,
            cell.y
        );
        self.row_offsets[cell.y] + cell.x
    }

    /// Index range of row `y` in the flat buffers.
    pub fn row_range(&self, y: usize) -> Range<usize> {
        let start = self.row_offsets[y];
        start..start + self.row_widths[y]
    }

    /// Position of a cell in the unwrapped map, in half-triangle columns.
    pub fn global_x(&self, cell: Cell) -> usize {
        self.global_x[self.index(cell)]
    }

    /// Orientation of a cell's triangle.
    pub fn orientation(&self, cell: Cell) -> Orientation {
        self.orientation[self.index(cell)]
    }

    /// The largest global x position of any row's last cell.
    pub fn max_global_x(&self) -> usize {
        (0..self.num_rows())
            .map(|y| self.global_x[self.row_range(y).end - 1])
            .max()
            .unwrap_or(0)
    }

    /// True if `(x, y)` names an existing cell.
    pub fn contains(&self, x: isize, y: isize) -> bool {
        y >= 0 && (y as usize) < self.num_rows() && x >= 0 && (x as usize) < self.width(y as usize)
    }

    /// Maps loose coordinates onto a cell.
    ///
    /// Rows are clamped to the poles; columns wrap around the row, so the
    /// grid wraps east-west but not across the poles.
    pub fn normalize(&self, x: isize, y: isize) -> Cell {
        let y = y.clamp(0, self.num_rows() as isize - 1) as usize;
        let w = self.width(y) as isize;
        Cell::new(x.rem_euclid(w) as usize, y)
    }

    /// Iterates over every cell, row by row from the north pole.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.row_widths
            .iter()
            .enumerate()
            .flat_map(|(y, &w)| (0..w).map(move |x| Cell::new(x, y)))
    }
}
