//! Generation stage trait and pipeline orchestration.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::GridError;
use crate::noise::FractalConfig;
use crate::terrain::Icosahedron;

/// Configuration shared by every stage in a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Fractal chain used by stages that synthesize elevation.
    pub fractal: FractalConfig,
    /// Additional stage-specific parameters.
    #[serde(default)]
    pub params: HashMap<String, f64>,
}

impl StageConfig {
    /// Creates a new configuration with the given fractal settings.
    pub fn with_fractal(fractal: FractalConfig) -> Self {
        Self {
            fractal,
            params: HashMap::new(),
        }
    }

    /// Sets a stage parameter.
    pub fn set_param(&mut self, key: &str, value: f64) -> &mut Self {
        self.params.insert(key.to_string(), value);
        self
    }

    /// Gets a stage parameter, returning a default if not set.
    pub fn get_param(&self, key: &str, default: f64) -> f64 {
        self.params.get(key).copied().unwrap_or(default)
    }
}

/// Mutable state threaded through a pipeline run.
///
/// Every random decision of every stage draws from the one generator, so a
/// run is reproducible from its seed.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub rng: ChaCha8Rng,
    pub config: StageConfig,
}

impl StageContext {
    pub fn new(seed: u64, config: StageConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage failed: {0}")]
    Grid(#[from] GridError),
    #[error("Missing dependency: stage '{stage}' requires '{dependency}'")]
    MissingDependency { stage: String, dependency: String },
    #[error("Unknown surface kind '{0}'")]
    UnknownSurface(String),
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the map in some way, building upon previous
/// stages.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> &'static str;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage ids that must be executed before this stage.
    fn dependencies(&self) -> &[&'static str] {
        &[]
    }

    /// Executes the generation stage, modifying the map in place.
    fn execute(&self, grid: &mut Icosahedron, ctx: &mut StageContext)
        -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Names of the stages, in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Executes all stages in order on the given map.
    pub fn run(&self, grid: &mut Icosahedron, ctx: &mut StageContext) -> Result<(), PipelineError> {
        self.run_with_callbacks(grid, ctx, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// Callbacks receive the stage name, its index and the stage count.
    pub fn run_with_callbacks<F1, F2>(
        &self,
        grid: &mut Icosahedron,
        ctx: &mut StageContext,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<&'static str> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency {
                        stage: stage.name().to_string(),
                        dependency: dep.to_string(),
                    });
                }
            }

            stage.execute(grid, ctx)?;
            completed.push(stage.id());
            tracing::debug!(stage = stage.id(), index = i, total, "pipeline.stage.completed");

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fill(u8);

    impl GenerationStage for Fill {
        fn id(&self) -> &'static str {
            "fill"
        }

        fn name(&self) -> &str {
            "Fill"
        }

        fn execute(
            &self,
            grid: &mut Icosahedron,
            _ctx: &mut StageContext,
        ) -> Result<(), PipelineError> {
            let cells: Vec<_> = grid.cells().collect();
            for cell in cells {
                grid.set_height_at(cell, self.0 as i32);
            }
            Ok(())
        }
    }

    struct NeedsFill;

    impl GenerationStage for NeedsFill {
        fn id(&self) -> &'static str {
            "needs_fill"
        }

        fn name(&self) -> &str {
            "Needs Fill"
        }

        fn dependencies(&self) -> &[&'static str] {
            &["fill"]
        }

        fn execute(
            &self,
            grid: &mut Icosahedron,
            _ctx: &mut StageContext,
        ) -> Result<(), PipelineError> {
            grid.set_height(0, 0, 99);
            Ok(())
        }
    }

    #[test]
    fn test_stage_config_params() {
        let mut config = StageConfig::default();
        config.set_param("temperature_k", 300.0);
        assert_eq!(config.get_param("temperature_k", 0.0), 300.0);
        assert_eq!(config.get_param("missing", 7.5), 7.5);
    }

    #[test]
    fn test_pipeline_runs_in_order() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(Fill(20)).add_stage(NeedsFill);
        assert_eq!(pipeline.stage_count(), 2);
        assert_eq!(pipeline.stage_names(), vec!["Fill", "Needs Fill"]);

        let mut grid = Icosahedron::new(3).unwrap();
        let mut ctx = StageContext::new(1, StageConfig::default());
        pipeline.run(&mut grid, &mut ctx).unwrap();
        assert_eq!(grid.height(0, 0), 99);
        assert_eq!(grid.height(1, 1), 20);
    }

    #[test]
    fn test_missing_dependency() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(NeedsFill);

        let mut grid = Icosahedron::new(3).unwrap();
        let mut ctx = StageContext::new(1, StageConfig::default());
        let err = pipeline.run(&mut grid, &mut ctx).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingDependency { ref stage, ref dependency }
                if stage == "Needs Fill" && dependency == "fill"
        ));
        assert_eq!(grid.height(0, 0), 50);
    }

    #[test]
    fn test_pipeline_with_callbacks() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(Fill(30));

        let mut grid = Icosahedron::new(3).unwrap();
        let mut ctx = StageContext::new(1, StageConfig::default());
        let mut started = false;
        let mut completed = false;

        pipeline
            .run_with_callbacks(
                &mut grid,
                &mut ctx,
                |name, _, _| {
                    assert_eq!(name, "Fill");
                    started = true;
                },
                |name, i, total| {
                    assert_eq!(name, "Fill");
                    assert_eq!((i, total), (0, 1));
                    completed = true;
                },
            )
            .unwrap();

        assert!(started);
        assert!(completed);
    }
}
