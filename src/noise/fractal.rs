//! Multi-octave fractal Brownian motion (fBm) on top of [`NoiseField`].

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::field::NoiseField;

/// Which single-octave evaluator to sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    #[default]
    Perlin,
    Simplex,
}

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalNoiseConfig {
    /// Evaluator used for each octave.
    pub kind: NoiseKind,
    /// Number of noise octaves (4-8 typical).
    pub octaves: u32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
    /// Multiplier applied to sample positions before the first octave.
    pub scale: f32,
    /// Raster units added per unit of summed noise when blending.
    pub amplitude: f32,
    /// Random seed for reproducible generation.
    pub seed: i32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            kind: NoiseKind::Perlin,
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
            scale: 1.0,
            amplitude: 32.0,
            seed: 42,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Many octaves with slow amplitude decay, for broken ground.
    pub fn rugged(seed: i32) -> Self {
        Self {
            kind: NoiseKind::Simplex,
            octaves: 8,
            lacunarity: 2.1,
            persistence: 0.6,
            scale: 2.0,
            amplitude: 48.0,
            seed,
        }
    }

    /// Few octaves with fast decay, for gentle undulation.
    pub fn gentle(seed: i32) -> Self {
        Self {
            kind: NoiseKind::Perlin,
            octaves: 3,
            lacunarity: 2.0,
            persistence: 0.4,
            scale: 1.0,
            amplitude: 16.0,
            seed,
        }
    }
}

/// Sums all configured octaves at `pos`.
///
/// The result is the raw octave sum, not normalised; with persistence below
/// one it stays within `1 / (1 - persistence)` of zero.
pub fn sample_fractal_noise(field: &NoiseField, pos: Vec3, config: &FractalNoiseConfig) -> f32 {
    let pos = pos * config.scale;
    (0..config.octaves).fold(0.0, |acc, n| match config.kind {
        NoiseKind::Perlin => field.perlin_3d(pos, n, config.lacunarity, config.persistence, acc),
        NoiseKind::Simplex => field.simplex_3d(pos, n, config.lacunarity, config.persistence, acc),
    })
}

/// Samples fractal noise for a batch of positions.
pub fn sample_fractal_noise_batch(
    field: &NoiseField,
    positions: &[Vec3],
    config: &FractalNoiseConfig,
) -> Vec<f32> {
    positions
        .iter()
        .map(|&pos| sample_fractal_noise(field, pos, config))
        .collect()
}

/// Blends fractal noise additively into an 8-bit sample at tile location `uv`.
pub fn blend_noise_sample(
    field: &NoiseField,
    uv: Vec2,
    sample: u8,
    config: &FractalNoiseConfig,
) -> u8 {
    let value = sample_fractal_noise(field, uv.extend(0.0), config);
    (sample as f32 + value * config.amplitude).round().clamp(0.0, 255.0) as u8
}
