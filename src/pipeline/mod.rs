//! Pipeline module for orchestrating map generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that can be composed into a complete surface generation pipeline.

mod stage;
mod surfaces;

pub use stage::{GenerationStage, Pipeline, PipelineError, StageConfig, StageContext};
pub use surfaces::{
    CrateredPlainsStage, HeightmapStage, MariaStage, OceanWorldStage, ReliefStage, SurfaceKind,
    DEFAULT_TEMPERATURE_K,
};
