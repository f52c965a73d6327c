//! Successive-refinement fractal elevation.
//!
//! A small map is seeded with uniform random heights. Each finer map then
//! averages four samples projected from its parent and adds a perturbation,
//! and the perturbation shrinks as the chain doubles in resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dice::Dice;
use crate::geometry::{Cell, GridError};
use crate::terrain::Icosahedron;

/// Configuration for a fractal elevation chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractalConfig {
    /// Face size of the randomly seeded map at the start of the chain.
    pub base_face_size: usize,
    /// Face size of the final map. Must be `base_face_size * 2^k`.
    pub face_size: usize,
    /// Perturbation of the first refinement, halved after each step.
    pub variation: u32,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            base_face_size: 3,
            face_size: 24,
            variation: 24,
        }
    }
}

impl FractalConfig {
    /// Default chain ending at the given face size.
    pub fn with_face_size(face_size: usize) -> Self {
        Self {
            face_size,
            ..Default::default()
        }
    }

    /// Gentler relief used for asteroids and other small bodies.
    pub fn small_body(face_size: usize) -> Self {
        Self {
            face_size,
            variation: 12,
            ..Default::default()
        }
    }

    /// Rough relief, perturbing as hard as the face size allows.
    pub fn rugged(face_size: usize) -> Self {
        Self {
            face_size,
            variation: face_size as u32,
            ..Default::default()
        }
    }

    /// Number of doublings from the base map to the final one.
    pub fn levels(&self) -> Result<u32, GridError> {
        let unreachable = || GridError::FaceSizeNotReachable {
            base: self.base_face_size,
            target: self.face_size,
        };
        if self.base_face_size == 0 {
            return Err(GridError::InvalidFaceSize(0));
        }
        if self.face_size < self.base_face_size || self.face_size % self.base_face_size != 0 {
            return Err(unreachable());
        }
        let ratio = self.face_size / self.base_face_size;
        if !ratio.is_power_of_two() {
            return Err(unreachable());
        }
        Ok(ratio.trailing_zeros())
    }
}

/// Sets every elevation to an independent `d100` roll.
pub fn seed_heights<R: Rng>(grid: &mut Icosahedron, rng: &mut R) {
    let cells: Vec<Cell> = grid.cells().collect();
    for cell in cells {
        grid.set_height_at(cell, rng.d100() as i32);
    }
}

/// Derives `grid`'s elevations from a coarser `parent`.
///
/// Each cell averages the parent height under itself, under its raw
/// `up_down` neighbour, and under the columns either side of it, then adds
/// `die_v(variation)`.
pub fn refine_heights<R: Rng>(
    grid: &mut Icosahedron,
    parent: &Icosahedron,
    variation: u32,
    rng: &mut R,
) -> Result<(), GridError> {
    if parent.num_rows() >= grid.num_rows() {
        return Err(GridError::ParentNotSmaller {
            parent_rows: parent.num_rows(),
            rows: grid.num_rows(),
        });
    }

    let cells: Vec<Cell> = grid.cells().collect();
    for cell in cells {
        let (x, y) = (cell.x as isize, cell.y as isize);
        let (ux, uy) = grid.topology().up_down_raw(cell);
        let sum = parent_height(grid, parent, x, y)
            + parent_height(grid, parent, ux, uy)
            + parent_height(grid, parent, x - 1, y)
            + parent_height(grid, parent, x + 1, y);
        let h = sum / 4 + rng.die_v(variation);
        grid.set_height_at(cell, h);
    }
    Ok(())
}

/// Height of the parent cell covering loose child coordinates `(x, y)`.
fn parent_height(grid: &Icosahedron, parent: &Icosahedron, x: isize, y: isize) -> i32 {
    let y = y.clamp(0, grid.num_rows() as isize - 1) as usize;
    let divisor = grid.num_rows() / parent.num_rows();
    let py = (y / divisor).min(parent.num_rows() - 1);
    let ratio = grid.topology().width(y) as f64 / parent.topology().width(py) as f64;
    let px = (x as f64 / ratio) as isize;
    parent.height(px, py as isize) as i32
}
