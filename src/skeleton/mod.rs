//! Turtle walk over a derived symbol string.
//!
//! Move symbols extend the current path with Bresenham lines, branch symbols
//! save and restore turtle states, and valley/detail symbols hand the path
//! to the terrain painters.

mod config;
mod line;
mod point;
mod turtle;

pub use config::GraphConfig;
pub use line::{extend_line, line_end};
pub use point::{wrap_degrees, BranchStack, SkeletonPath, TerrainPoint};
pub use turtle::{SkeletonBuilder, SkeletonEvent, TurnAngle, TurtleOp};
