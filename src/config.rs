//! Whole-run configuration loaded from TOML.

use std::fs;
use std::path::Path;

use glam::UVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::noise::FractalNoiseConfig;
use crate::pipeline::{GenerationMode, StageConfig};
use crate::skeleton::GraphConfig;

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Raster size, seeds and layer parameters for one generated terrain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: u32,
    pub height: u32,
    /// Seed of the ridge generator. The noise layer has its own seed.
    pub seed: i32,
    /// Raster cells per tile-coordinate unit, as `[x, y]`.
    pub tile: UVec2,
    pub mode: GenerationMode,
    pub graph: GraphConfig,
    pub noise: FractalNoiseConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            seed: 0,
            tile: UVec2::splat(64),
            mode: GenerationMode::Full,
            graph: GraphConfig::default(),
            noise: FractalNoiseConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: TerrainConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&s)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "raster size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.tile.x == 0 || self.tile.y == 0 {
            return Err(ConfigError::Invalid(format!(
                "tile size must be positive, got {}x{}",
                self.tile.x, self.tile.y
            )));
        }
        if self.graph.angle_min > self.graph.angle_max {
            return Err(ConfigError::Invalid(format!(
                "angle_min ({}) exceeds angle_max ({})",
                self.graph.angle_min, self.graph.angle_max
            )));
        }
        Ok(())
    }

    pub fn stage_config(&self) -> StageConfig {
        StageConfig {
            seed: self.seed,
            tile: self.tile,
            graph: self.graph.clone(),
            noise: self.noise.clone(),
        }
    }
}
