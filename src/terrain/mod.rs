//! Terrain data module.
//!
//! Provides the `Icosahedron` map type and the fractal heightmap chain that
//! fills its elevations.

mod icosahedron;
mod heightmap;

pub use icosahedron::{Icosahedron, DEFAULT_HEIGHT, MAX_HEIGHT, MIN_HEIGHT};
pub use heightmap::{fractal_height_map, generate_height_map, sea_level};
