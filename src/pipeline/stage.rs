//! Generation stage trait and pipeline orchestration.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::noise::{blend_noise_sample, FractalNoiseConfig, NoiseField};
use crate::skeleton::GraphConfig;
use crate::terrain::{ElevationGenerator, HeightField};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Grammar-driven ridge raster.
    Elevation,
    /// Additive fractal noise over the tile grid.
    Noise,
    /// Caller-supplied per-tile function.
    TileFn,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Elevation => "elevation",
            StageId::Noise => "noise",
            StageId::TileFn => "tile-fn",
        }
    }
}

/// Which layers a generated raster is composed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Ridges, then the per-tile function over them.
    #[default]
    Full,
    /// Per-tile function over a black raster.
    NoiseOnly,
    /// Ridges only.
    ElevationOnly,
}

impl GenerationMode {
    pub fn name(&self) -> &'static str {
        match self {
            GenerationMode::Full => "full",
            GenerationMode::NoiseOnly => "noise-only",
            GenerationMode::ElevationOnly => "elevation-only",
        }
    }
}

/// Configuration passed to each generation stage.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Seed of the elevation generator's random stream.
    pub seed: i32,
    /// Raster cells per unit of tile coordinate along x and y.
    pub tile: UVec2,
    pub graph: GraphConfig,
    pub noise: FractalNoiseConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tile: UVec2::splat(64),
            graph: GraphConfig::default(),
            noise: FractalNoiseConfig::default(),
        }
    }
}

impl StageConfig {
    /// Tile-space coordinate of raster cell `(x, y)`.
    pub fn tile_coord(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            x as f32 / self.tile.x.max(1) as f32,
            y as f32 / self.tile.y.max(1) as f32,
        )
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the raster in place, building upon previous stages.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage, modifying the raster in place.
    fn execute(&self, field: &mut HeightField, config: &StageConfig) -> Result<(), PipelineError>;

    /// Optional progress callback for long-running stages.
    ///
    /// # Arguments
    /// * `progress` - Value from 0.0 to 1.0 indicating completion
    fn on_progress(&self, _progress: f32) {}
}

/// Orchestrates multiple generation stages into a complete pipeline.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: StageConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: StageConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Builds the stage list for `mode`, using the built-in noise blend as
    /// the per-tile function.
    pub fn for_mode(mode: GenerationMode, config: StageConfig) -> Self {
        let mut pipeline = Self::new(config);
        match mode {
            GenerationMode::Full => {
                pipeline.add_stage(ElevationStage);
                pipeline.add_stage(NoiseStage);
            }
            GenerationMode::NoiseOnly => {
                pipeline.add_stage(NoiseStage);
            }
            GenerationMode::ElevationOnly => {
                pipeline.add_stage(ElevationStage);
            }
        }
        pipeline
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

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Executes all stages in order on the given raster.
    pub fn run(&self, field: &mut HeightField) -> Result<(), PipelineError> {
        self.run_with_callbacks(field, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `field` - The raster to generate into
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        field: &mut HeightField,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            log::debug!("running stage {} ({}/{})", stage.id().name(), i + 1, total);
            stage.execute(field, &self.config)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Applies `f(tile_coord, sample)` to every cell, column by column.
pub fn apply_tile_fn<F>(field: &mut HeightField, config: &StageConfig, mut f: F)
where
    F: FnMut(Vec2, u8) -> u8,
{
    let (width, height) = (field.width(), field.height());
    let samples = field.samples_mut();
    for x in 0..width {
        for y in 0..height {
            let index = x as usize * height as usize + y as usize;
            samples[index] = f(config.tile_coord(x, y), samples[index]);
        }
    }
}

fn ensure_not_empty(stage: &dyn GenerationStage, field: &HeightField) -> Result<(), PipelineError> {
    if field.is_empty() {
        return Err(PipelineError::StageFailed(
            stage.name().to_string(),
            "raster has no samples".to_string(),
        ));
    }
    Ok(())
}

/// Replaces the raster with grammar-driven ridges.
pub struct ElevationStage;

impl GenerationStage for ElevationStage {
    fn id(&self) -> StageId {
        StageId::Elevation
    }

    fn name(&self) -> &str {
        "Elevation Generation"
    }

    fn execute(&self, field: &mut HeightField, config: &StageConfig) -> Result<(), PipelineError> {
        ensure_not_empty(self, field)?;
        let mut generator = ElevationGenerator::new(config.seed, field.width(), field.height());
        let trace = generator.generate_graph_traced(&config.graph);
        log::info!(
            "painted {} ridges from {} symbols",
            trace.ridges.len(),
            trace.derived_len
        );
        *field = trace.field;
        self.on_progress(1.0);
        Ok(())
    }
}

/// Blends fractal noise into every tile.
pub struct NoiseStage;

impl GenerationStage for NoiseStage {
    fn id(&self) -> StageId {
        StageId::Noise
    }

    fn name(&self) -> &str {
        "Noise Blend"
    }

    fn execute(&self, field: &mut HeightField, config: &StageConfig) -> Result<(), PipelineError> {
        ensure_not_empty(self, field)?;
        let noise = NoiseField::new(config.noise.seed);
        apply_tile_fn(field, config, |uv, sample| {
            blend_noise_sample(&noise, uv, sample, &config.noise)
        });
        let (lo, hi) = field.height_range();
        log::info!("noise blended, samples now span {}..={}", lo, hi);
        Ok(())
    }
}

/// Signature of a caller-supplied per-tile function.
pub type TileFn = dyn Fn(Vec2, u8) -> u8 + Send + Sync;

/// Runs a caller-supplied function over every tile.
pub struct TileFnStage {
    func: Box<TileFn>,
}

impl TileFnStage {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Vec2, u8) -> u8 + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
        }
    }
}

impl GenerationStage for TileFnStage {
    fn id(&self) -> StageId {
        StageId::TileFn
    }

    fn name(&self) -> &str {
        "Tile Function"
    }

    fn execute(&self, field: &mut HeightField, config: &StageConfig) -> Result<(), PipelineError> {
        ensure_not_empty(self, field)?;
        apply_tile_fn(field, config, |uv, sample| (self.func)(uv, sample));
        Ok(())
    }
}
