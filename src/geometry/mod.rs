//! Icosahedral grid geometry.
//!
//! The sphere is unfolded into five gores of triangular cells laid out in
//! rows. This module owns the row layout (widths, global positions and
//! triangle orientation) and the neighbour arithmetic built on top of it.

mod orientation;
mod topology;
pub mod neighbors;

pub use orientation::Orientation;
pub use topology::{Cell, GridError, GridTopology, GORES};
