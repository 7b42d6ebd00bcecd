//! Turtle positions, skeleton paths and the branch stack.

use serde::{Deserialize, Serialize};

/// Wraps any degree value into `[0, 360)`.
#[inline]
pub fn wrap_degrees(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// One raster cell visited by the turtle.
///
/// Heading 0 points along +y, 90 along +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerrainPoint {
    pub x: i32,
    pub y: i32,
    /// Degrees in `[0, 360)`.
    pub heading: i32,
    pub height: i32,
}

impl TerrainPoint {
    pub fn new(x: i32, y: i32, heading: i32) -> Self {
        Self {
            x,
            y,
            heading: wrap_degrees(heading),
            height: 0,
        }
    }

    pub fn rotate(&mut self, degrees: i32) {
        self.heading = wrap_degrees(self.heading + degrees);
    }

    /// Heading offset by `degrees` without wrapping negatives, for trig only.
    #[inline]
    pub fn heading_offset(&self, degrees: i32) -> i32 {
        (self.heading + degrees) % 360
    }
}

/// One continuous turtle-walk line.
pub type SkeletonPath = Vec<TerrainPoint>;

/// Saved turtle states for open branches.
#[derive(Debug, Clone, Default)]
pub struct BranchStack {
    saved: Vec<TerrainPoint>,
}

impl BranchStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: TerrainPoint) {
        self.saved.push(point);
    }

    pub fn pop(&mut self) -> Option<TerrainPoint> {
        self.saved.pop()
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}
