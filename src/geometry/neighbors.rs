//! Neighbour arithmetic on the icosahedral grid.
//!
//! Every cell has three edge neighbours: west and east along its row, and
//! one cell across its flat side (`up_down`). `opposite` steps the other way,
//! through the cell's apex.
//!
//! Rows in the polar caps differ in width, so stepping between rows has to
//! rescale the column. The arithmetic is an approximation at the cap/band
//! seams and can land outside the grid; the checked variants return `None`
//! in that case.

use super::{Cell, GridTopology, GORES};

impl GridTopology {
    /// The cell to the west, wrapping around the row.
    pub fn west(&self, cell: Cell) -> Cell {
        let w = self.width(cell.y);
        Cell::new((cell.x + w - 1) % w, cell.y)
    }

    /// The cell to the east, wrapping around the row.
    pub fn east(&self, cell: Cell) -> Cell {
        Cell::new((cell.x + 1) % self.width(cell.y), cell.y)
    }

    /// The neighbour across the cell's flat side, if it lies inside the grid.
    pub fn up_down(&self, cell: Cell) -> Option<Cell> {
        self.checked(self.up_down_raw(cell))
    }

    /// The cell beyond the cell's apex, if it lies inside the grid.
    ///
    /// Always `None` on the two pole rows.
    pub fn opposite(&self, cell: Cell) -> Option<Cell> {
        self.checked(self.opposite_raw(cell))
    }

    /// Unchecked `up_down` step. The column may fall outside the row.
    pub(crate) fn up_down_raw(&self, cell: Cell) -> (isize, isize) {
        self.step(cell, true)
    }

    /// Unchecked `opposite` step. Row and column may fall outside the grid.
    pub(crate) fn opposite_raw(&self, cell: Cell) -> (isize, isize) {
        self.step(cell, false)
    }

    fn checked(&self, (x, y): (isize, isize)) -> Option<Cell> {
        if self.contains(x, y) {
            Some(Cell::new(x as usize, y as usize))
        } else {
            None
        }
    }

    fn step(&self, cell: Cell, across_base: bool) -> (isize, isize) {
        let dir = self.orientation(cell).sign();
        let f = self.face_size() as isize;
        let x = cell.x as isize;
        let y = cell.y as isize;
        let ny = if across_base { y - dir } else { y + dir };

        if ny < 0 || ny >= self.num_rows() as isize {
            return (x, ny);
        }

        let nx = if y < f || y >= 2 * f {
            // Polar caps: shift by the width lost or gained in every gore to
            // the west, plus half of it within this gore.
            let org = (self.width(cell.y) / GORES) as isize;
            let new = (self.width(ny as usize) / GORES) as isize;
            let delta = org - new;
            x - delta * (x / org) - delta / 2
        } else if y == f && ny == f - 1 {
            x - (x / (2 * f) + 1)
        } else if y == 2 * f - 1 && ny == 2 * f {
            if across_base {
                x - x / (2 * f)
            } else {
                x + x / (2 * f)
            }
        } else if across_base {
            x - dir
        } else {
            x + dir
        };

        (nx, ny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACE_SIZES: [usize; 7] = [1, 2, 3, 4, 5, 8, 12];

    #[test]
    fn test_west_east_bijection() {
        for face_size in FACE_SIZES {
            let topo = GridTopology::new(face_size).unwrap();
            for cell in topo.cells() {
                assert_eq!(topo.west(topo.east(cell)), cell);
                assert_eq!(topo.east(topo.west(cell)), cell);
            }
        }
    }

    #[test]
    fn test_west_east_wrap() {
        let topo = GridTopology::new(3).unwrap();
        assert_eq!(topo.west(Cell::new(0, 4)), Cell::new(29, 4));
        assert_eq!(topo.east(Cell::new(29, 4)), Cell::new(0, 4));
        assert_eq!(topo.east(Cell::new(4, 0)), Cell::new(0, 0));
    }

    #[test]
    fn test_up_down_always_in_range() {
        for face_size in FACE_SIZES {
            let topo = GridTopology::new(face_size).unwrap();
            for cell in topo.cells() {
                assert!(topo.up_down(cell).is_some(), "F={} cell {:?}", face_size, cell);
            }
        }
    }

    #[test]
    fn test_up_down_moves_one_row() {
        for face_size in FACE_SIZES {
            let topo = GridTopology::new(face_size).unwrap();
            for cell in topo.cells() {
                let n = topo.up_down(cell).unwrap();
                let expected = cell.y as isize - topo.orientation(cell).sign();
                assert_eq!(n.y as isize, expected);
            }
        }
    }

    #[test]
    fn test_up_down_involution_off_north_seam() {
        for face_size in FACE_SIZES {
            let topo = GridTopology::new(face_size).unwrap();
            for cell in topo.cells() {
                if cell.y == face_size - 1 || cell.y == face_size {
                    continue;
                }
                let n = topo.up_down(cell).unwrap();
                assert_eq!(topo.up_down(n), Some(cell), "F={} cell {:?}", face_size, cell);
            }
        }
    }

    #[test]
    fn test_up_down_known_cells() {
        let topo = GridTopology::new(3).unwrap();
        assert_eq!(topo.up_down(Cell::new(0, 0)), Some(Cell::new(1, 1)));
        assert_eq!(topo.up_down(Cell::new(1, 0)), Some(Cell::new(4, 1)));
        assert_eq!(topo.up_down(Cell::new(5, 4)), Some(Cell::new(4, 3)));
        assert_eq!(topo.up_down(Cell::new(2, 6)), Some(Cell::new(2, 5)));
        assert_eq!(topo.up_down(Cell::new(4, 8)), Some(Cell::new(13, 7)));
    }

    #[test]
    fn test_opposite_none_at_poles() {
        for face_size in FACE_SIZES {
            let topo = GridTopology::new(face_size).unwrap();
            let last = topo.num_rows() - 1;
            for x in 0..topo.width(0) {
                assert_eq!(topo.opposite(Cell::new(x, 0)), None);
                assert_eq!(topo.opposite(Cell::new(x, last)), None);
            }
        }
    }

    #[test]
    fn test_opposite_goes_to_other_row() {
        for face_size in FACE_SIZES {
            let topo = GridTopology::new(face_size).unwrap();
            for cell in topo.cells() {
                let across = topo.up_down(cell).unwrap();
                if let Some(o) = topo.opposite(cell) {
                    assert_eq!(o.y + across.y, cell.y * 2);
                }
            }
        }
    }

    #[test]
    fn test_opposite_known_cells() {
        let topo = GridTopology::new(3).unwrap();
        assert_eq!(topo.opposite(Cell::new(3, 1)), Some(Cell::new(0, 0)));
        assert_eq!(topo.opposite(Cell::new(5, 4)), Some(Cell::new(6, 5)));
        assert_eq!(topo.opposite(Cell::new(7, 5)), Some(Cell::new(8, 6)));
        assert_eq!(topo.opposite(Cell::new(2, 6)), Some(Cell::new(1, 7)));
        // Gore edges next to the seams step off the row.
        assert_eq!(topo.opposite(Cell::new(0, 1)), None);
        assert_eq!(topo.opposite(Cell::new(29, 5)), None);
        assert_eq!(topo.opposite_raw(Cell::new(29, 5)), (33, 6));
    }

    #[test]
    fn test_opposite_is_not_inverse_of_up_down() {
        for face_size in FACE_SIZES {
            let topo = GridTopology::new(face_size).unwrap();
            for cell in topo.cells() {
                let across = topo.up_down(cell).unwrap();
                assert_ne!(topo.opposite(across), Some(cell));
            }
        }
    }
}
