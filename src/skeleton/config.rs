//! Configuration for grammar-driven ridge generation.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::turtle::TurnAngle;
use crate::grammar::DEFAULT_MAX_DERIVATION_LEN;

/// Parameters for one skeleton walk and the ridges painted along it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Raster cell the turtle starts on.
    pub start: IVec2,
    /// Weighted productions, e.g. `F{FF:50,F+F:50}`.
    pub rules: String,
    pub axiom: String,
    /// Rewriting rounds applied to the axiom.
    pub iterations: u32,
    /// Ceiling on derived string length, in bytes.
    pub max_derivation_len: usize,

    /// Cells advanced per move symbol.
    pub step_length: i32,
    /// Turn angle bounds in degrees. Equal bounds give a fixed turn.
    pub angle_min: i32,
    pub angle_max: i32,

    /// Footprint radius of a sample standing at `peak_height`.
    pub radius: i32,
    /// Ridge height at the peak marker, in raster units above `start_height`.
    pub peak_height: i32,
    /// Lobe asymmetry in `[-1, 1]`. Positive widens the right lobe.
    pub skew: f32,
    /// Half-width in degrees of the painted sector on each side of the path.
    pub fill_degree: i32,
    /// Fraction of the lobe radius covered by the rounded cap.
    pub top_blend: f32,

    /// Midpoint displacement rounds per half profile.
    pub displacement_iterations: u32,
    /// Displacement decays by `2^-smoothness` per round.
    pub displacement_smoothness: f32,
    /// Floor value the ridge field is initialised with.
    pub start_height: i32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            start: IVec2::new(256, 256),
            rules: "F{F:40,FF:30,F+F:15,F-F:15}".to_string(),
            axiom: "FFFPFFFL".to_string(),
            iterations: 3,
            max_derivation_len: DEFAULT_MAX_DERIVATION_LEN,
            step_length: 3,
            angle_min: 30,
            angle_max: 30,
            radius: 50,
            peak_height: 50,
            skew: 0.0,
            fill_degree: 90,
            top_blend: 0.1,
            displacement_iterations: 5,
            displacement_smoothness: 1.1,
            start_height: 50,
        }
    }
}

impl GraphConfig {
    /// One straight ridge with no rewriting.
    pub fn ridge() -> Self {
        Self {
            rules: String::new(),
            axiom: "FFFFFFFFPFFFFFFFFL".to_string(),
            iterations: 0,
            step_length: 8,
            ..Default::default()
        }
    }

    /// Main ridge with randomly angled spurs.
    pub fn branching_range() -> Self {
        Self {
            rules: "F{F[+FFL]F:30,F[-FFL]F:30,FF:40}".to_string(),
            axiom: "FFPFFL".to_string(),
            iterations: 3,
            step_length: 6,
            angle_min: 20,
            angle_max: 60,
            radius: 40,
            peak_height: 80,
            skew: 0.2,
            ..Default::default()
        }
    }

    /// Low, wide swells with fine detail along the walk.
    pub fn rolling_hills() -> Self {
        Self {
            rules: "F{FE:50,F+F:25,F-F:25}".to_string(),
            axiom: "FFPFFL".to_string(),
            iterations: 4,
            step_length: 5,
            angle_min: 10,
            angle_max: 45,
            radius: 90,
            peak_height: 30,
            top_blend: 0.3,
            displacement_smoothness: 2.0,
            start_height: 40,
            ..Default::default()
        }
    }

    pub fn turn_angle(&self) -> TurnAngle {
        TurnAngle::new(self.angle_min, self.angle_max)
    }
}
