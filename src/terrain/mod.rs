//! Terrain rasterisation.
//!
//! Provides the [`HeightField`] raster and the ridge generator that profiles
//! skeleton paths and paints them into it.

mod falloff;
mod generator;
mod gradient;
mod heightfield;
mod profile;

pub use falloff::{exp_decay, exp_decay_a, linear, linear_m, linear_x, parabola, parabola_a};
pub use generator::{ElevationGenerator, GraphTrace};
pub use gradient::{
    footprint_bounds, paint_path, paint_sample, relative_bearing, GradientParams, SampleProfile,
};
pub use heightfield::{combine, map_float_to_int, map_to_8bit, HeightField, MergeMode};
pub use profile::{profile_heights, subdivide, MidpointSample, ProfileParams};
