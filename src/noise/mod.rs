//! Noise generation module for terrain synthesis.
//!
//! Seeded Perlin and Simplex lattice noise over a shuffled permutation table,
//! evaluated one octave at a time and summed by the fractal helpers.

mod field;
mod fractal;
mod perlin;
mod permutation;
mod simplex;

pub use field::{stream_seed, NoiseField};
pub use fractal::{
    blend_noise_sample, sample_fractal_noise, sample_fractal_noise_batch, FractalNoiseConfig,
    NoiseKind,
};
pub use perlin::perlin_3d;
pub use permutation::{PermutationTable, ShuffleBound, BASE_PERMUTATION, TABLE_LEN};
pub use simplex::simplex_3d;
