//! Procedural icosahedral world maps.
//!
//! This crate unfolds a sphere into the triangular cells of a subdivided
//! icosahedron, fills it with fractal elevation, paints surface tiles by
//! flooding and cratering, and rasterizes the result to images.

pub mod dice;
pub mod tile;
pub mod geometry;
pub mod terrain;
pub mod noise;
pub mod growth;
pub mod export;
pub mod pipeline;

pub use dice::Dice;
pub use geometry::{Cell, GridError, GridTopology, Orientation};
pub use tile::{Tile, TileDetail, TileError};
pub use terrain::Icosahedron;
pub use noise::FractalConfig;
pub use export::{ExportError, MapExportOptions, RasterOptions};
pub use pipeline::{GenerationStage, Pipeline, PipelineError, StageConfig, StageContext, SurfaceKind};
