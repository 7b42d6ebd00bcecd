//! Grammar-driven procedural terrain generator.
//!
//! A stochastic rewriting grammar is walked by a turtle into ridge skeletons,
//! which are profiled by midpoint displacement and painted into an 8-bit
//! height field. Seeded Perlin and Simplex noise supply a second layer, and
//! the pipeline composes both into a single raster.

pub mod config;
pub mod export;
pub mod grammar;
pub mod noise;
pub mod pipeline;
pub mod skeleton;
pub mod terrain;

pub use config::{ConfigError, TerrainConfig};
pub use grammar::{derive, RuleSet};
pub use noise::{FractalNoiseConfig, NoiseField, PermutationTable};
pub use pipeline::{ElevationStage, GenerationStage, NoiseStage, Pipeline, StageConfig};
pub use skeleton::{GraphConfig, SkeletonBuilder};
pub use terrain::{combine, ElevationGenerator, HeightField, MergeMode};
