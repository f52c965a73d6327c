//! Surface classification values painted onto grid cells.
//!
//! A [`Tile`] carries a display colour plus the flags terrain code cares
//! about (liquid or not, how much per-pixel colour noise to draw with, and
//! an optional surface detail overlay).

mod detail;
mod value;

pub use detail::TileDetail;
pub use value::{Tile, TileError};
