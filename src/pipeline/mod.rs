//! Pipeline module for composing raster generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that can be composed into elevation, noise, or combined rasters.

mod stage;

pub use stage::{
    apply_tile_fn, ElevationStage, GenerationMode, GenerationStage, NoiseStage, Pipeline,
    PipelineError, StageConfig, StageId, TileFn, TileFnStage,
};
