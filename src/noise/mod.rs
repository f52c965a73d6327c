//! Fractal elevation synthesis.
//!
//! Heights are built by successive refinement over a chain of icosahedral
//! maps, each twice the face size of the one before.

mod fractal;

pub use fractal::{refine_heights, seed_heights, FractalConfig};
