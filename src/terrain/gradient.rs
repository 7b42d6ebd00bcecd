//! Cross-section painter: turns skeleton samples into raster footprints.
//!
//! Each sample paints two lobes, one on each side of its heading. A lobe's
//! profile is a rounded parabolic cap near the centre, a linear flank, and
//! an exponential tail beyond the quarter-height point.

use glam::IVec2;

use super::falloff::{exp_decay, exp_decay_a, linear, linear_m, linear_x, parabola, parabola_a};
use super::heightfield::{HeightField, MergeMode};
use crate::skeleton::{wrap_degrees, TerrainPoint};

/// Height the exponential tail decays to at the end of the flank.
const TAIL_TARGET: f32 = 0.1;
/// Share of the lobe radius the linear flank spans.
const FLANK_SHARE: f32 = 0.75;

/// Footprint shape shared by every sample of one painting pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientParams {
    /// Footprint radius of a sample at `peak_height`. Scales linearly below it.
    pub radius: i32,
    pub peak_height: i32,
    /// Moves radius from the left lobe to the right one.
    pub skew: f32,
    /// Half-width in degrees of each painted sector.
    pub fill_degree: i32,
    /// Fraction of each lobe radius covered by the cap.
    pub top_blend: f32,
}

impl GradientParams {
    /// Footprint radius for a sample standing at `height`.
    pub fn sample_radius(&self, height: i32) -> i32 {
        if self.peak_height == 0 {
            return 0;
        }
        ((self.radius as f32 / self.peak_height as f32) * height as f32) as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Lobe {
    radius: i32,
    slope: f32,
    tail_base: f32,
    tail_offset: i32,
    tail_height: i32,
    cap_start: i32,
    cap_shift: i32,
}

impl Lobe {
    fn new(height: i32, radius: i32, top_blend: f32) -> Self {
        let h = height as f32;
        let flank = radius as f32 * FLANK_SHARE;
        let quarter = height / 4;
        let slope = linear_m(h, flank, -1.0);
        let tail_base = exp_decay_a(h, flank, TAIL_TARGET);
        let tail_height = if tail_base == 0.0 {
            0
        } else {
            (quarter as f32 / tail_base) as i32
        };
        Self {
            radius,
            slope,
            tail_base,
            tail_offset: linear_x(slope, h, quarter as f32) as i32,
            tail_height,
            cap_start: (top_blend * radius as f32) as i32,
            cap_shift: 0,
        }
    }
}

/// Closed-form cross-section of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleProfile {
    height: i32,
    left: Lobe,
    right: Lobe,
    cap_a: f32,
    cap_height: i32,
}

impl SampleProfile {
    /// Fits the lobe curves for a sample of `height` and footprint `radius`.
    pub fn new(height: i32, radius: i32, skew: f32, top_blend: f32) -> Self {
        let left_radius = (radius as f32 * (1.0 - skew)) as i32;
        let right_radius = (radius as f32 * (1.0 + skew)) as i32;
        let mut left = Lobe::new(height, left_radius, top_blend);
        let mut right = Lobe::new(height, right_radius, top_blend);

        let cap_base = linear(left.slope, left.cap_start as f32, height as f32);
        let cap_peak = (height - cap_base) / 2;
        let cap_centre = (left.cap_start + right.cap_start) / 2;
        left.cap_shift = left.cap_start - cap_centre;
        right.cap_shift = right.cap_start - cap_centre;

        Self {
            height,
            left,
            right,
            cap_a: parabola_a(cap_peak as f32, cap_centre as f32),
            cap_height: cap_peak + cap_base,
        }
    }

    pub fn left_radius(&self) -> i32 {
        self.left.radius
    }

    pub fn right_radius(&self) -> i32 {
        self.right.radius
    }

    /// Height at distance `eu` from the centre on the left lobe.
    pub fn left_height(&self, eu: f32) -> i32 {
        self.lobe_height(&self.left, eu)
    }

    /// Height at distance `eu` from the centre on the right lobe.
    pub fn right_height(&self, eu: f32) -> i32 {
        self.lobe_height(&self.right, eu)
    }

    fn lobe_height(&self, lobe: &Lobe, eu: f32) -> i32 {
        if eu > lobe.tail_offset as f32 {
            exp_decay(lobe.tail_base, lobe.tail_height as f32, eu - lobe.tail_offset as f32)
        } else if eu < lobe.cap_start as f32 {
            let x = ((eu + lobe.cap_shift as f32) as i32).abs();
            parabola(self.cap_a, self.cap_height as f32, x as f32)
        } else {
            linear(lobe.slope, eu, self.height as f32)
        }
    }
}

/// Corner-derived bounds of a sample's footprint, relative to the sample.
///
/// The four corners of the heading-aligned rectangle are rounded
/// separately; each bound then takes the corner of larger magnitude, with
/// the y bounds compared after scaling by the opposite lobe's radius. Ties
/// go to the second corner of each comparison.
pub fn footprint_bounds(
    point: &TerrainPoint,
    radius: i32,
    left_radius: i32,
    right_radius: i32,
) -> (IVec2, IVec2) {
    let offset = |along: i32, reach: i32, side: i32, side_reach: i32| {
        let along = (point.heading_offset(along) as f32).to_radians();
        let side = (point.heading_offset(side) as f32).to_radians();
        IVec2::new(
            (along.sin() * reach as f32).round() as i32
                + (side.sin() * side_reach as f32).round() as i32,
            (along.cos() * reach as f32).round() as i32
                + (side.cos() * side_reach as f32).round() as i32,
        )
    };
    let a = offset(180, radius, -90, left_radius);
    let b = offset(180, radius, 90, right_radius);
    let c = offset(0, radius, 90, right_radius);
    let d = offset(0, radius, -90, left_radius);

    let scaled = |v: i32, r: i32| (v as i64 * r as i64).abs();
    let start = IVec2::new(
        if a.x.abs() > d.x.abs() { a.x } else { d.x },
        if scaled(a.y, right_radius) > scaled(b.y, left_radius) { a.y } else { b.y },
    );
    let end = IVec2::new(
        if c.x.abs() > b.x.abs() { c.x } else { b.x },
        if scaled(c.y, left_radius) > scaled(d.y, right_radius) { c.y } else { d.y },
    );
    (start, end)
}

/// Bearing of offset `(x, y)` in degrees, 0 along the sample's heading and
/// increasing clockwise.
#[inline]
pub fn relative_bearing(x: i32, y: i32, heading: i32) -> i32 {
    let raw = (y as f32).atan2(x as f32).to_degrees() as i32;
    wrap_degrees(wrap_degrees(-(raw - 90)) - heading)
}

/// Euclidean distance of offset `(x, y)` from the sample.
#[inline]
fn offset_distance(x: i32, y: i32) -> f32 {
    let (x, y) = (x as i64, y as i64);
    ((x * x + y * y) as f32).sqrt()
}

/// Paints one sample into `field`.
///
/// # Arguments
/// * `field` - Raster to write into
/// * `point` - Sample position, heading and height
/// * `params` - Footprint shape shared by the pass
/// * `mode` - How each cell merges with what is already there
///
/// # Returns
/// The number of cells the merge accepted.
pub fn paint_sample(
    field: &mut HeightField,
    point: &TerrainPoint,
    params: &GradientParams,
    mode: MergeMode,
) -> usize {
    let radius = params.sample_radius(point.height);
    if point.height <= 0 || radius <= 0 {
        return 0;
    }
    let profile = SampleProfile::new(point.height, radius, params.skew, params.top_blend);
    let (start, end) = footprint_bounds(point, radius, profile.left_radius(), profile.right_radius());
    let fill = params.fill_degree;

    let mut written = 0;
    for x in start.x.min(end.x)..=start.x.max(end.x) {
        for y in start.y.min(end.y)..=start.y.max(end.y) {
            let bearing = relative_bearing(x, y, point.heading);
            let eu = offset_distance(x, y);
            let value = if (bearing > 270 - fill && bearing < 270 + fill) || (x == 0 && y == 0) {
                profile.left_height(eu)
            } else if bearing > 90 - fill && bearing < 90 + fill {
                profile.right_height(eu)
            } else {
                continue;
            };
            if field.write(x + point.x, y + point.y, value, mode) {
                written += 1;
            }
        }
    }
    written
}

/// Paints every sample of `path` in order.
pub fn paint_path(
    field: &mut HeightField,
    path: &[TerrainPoint],
    params: &GradientParams,
    mode: MergeMode,
) -> usize {
    path.iter()
        .map(|point| paint_sample(field, point, params, mode))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GradientParams {
        GradientParams {
            radius: 10,
            peak_height: 50,
            skew: 0.0,
            fill_degree: 90,
            top_blend: 0.1,
        }
    }

    fn peak_point(x: i32, y: i32, heading: i32) -> TerrainPoint {
        TerrainPoint {
            height: 50,
            ..TerrainPoint::new(x, y, heading)
        }
    }

    #[test]
    fn test_bounds_symmetric_heading_north() {
        let p = TerrainPoint::new(0, 0, 0);
        let (start, end) = footprint_bounds(&p, 50, 50, 50);
        assert_eq!(start, IVec2::new(-50, -50));
        assert_eq!(end, IVec2::new(50, 50));
    }

    #[test]
    fn test_bounds_skewed_heading_north() {
        let p = TerrainPoint::new(0, 0, 0);
        let (start, end) = footprint_bounds(&p, 20, 10, 30);
        assert_eq!(start, IVec2::new(-10, -20));
        assert_eq!(end, IVec2::new(30, 20));
    }

    #[test]
    fn test_bounds_heading_east_tie_breaks() {
        let p = TerrainPoint::new(0, 0, 90);
        let (start, end) = footprint_bounds(&p, 10, 10, 10);
        assert_eq!(start, IVec2::new(10, -10));
        assert_eq!(end, IVec2::new(-10, 10));
    }

    #[test]
    fn test_bounds_wide_skewed_footprint() {
        let p = TerrainPoint::new(0, 0, 0);
        let (start, end) = footprint_bounds(&p, 100_000, 50_000, 150_000);
        assert_eq!(start, IVec2::new(-50_000, -100_000));
        assert_eq!(end, IVec2::new(150_000, 100_000));
    }

    #[test]
    fn test_offset_distance() {
        assert_eq!(offset_distance(3, 4), 5.0);
        assert_eq!(offset_distance(0, 0), 0.0);
        let far = offset_distance(60_000, -80_000);
        assert!((far - 100_000.0).abs() < 1.0, "{}", far);
    }

    #[test]
    fn test_relative_bearing() {
        assert_eq!(relative_bearing(0, 5, 0), 0);
        assert_eq!(relative_bearing(5, 0, 0), 90);
        assert_eq!(relative_bearing(0, -5, 0), 180);
        assert_eq!(relative_bearing(-5, 0, 0), 270);
        assert_eq!(relative_bearing(5, 0, 90), 0);
    }

    #[test]
    fn test_profile_falls_off() {
        let profile = SampleProfile::new(50, 50, 0.0, 0.1);
        let centre = profile.left_height(0.0);
        let flank = profile.left_height(20.0);
        let tail = profile.left_height(45.0);
        assert!(centre > flank && flank > tail, "{} {} {}", centre, flank, tail);
        assert!(centre <= 50);
        assert!(tail >= 0);
        assert_eq!(profile.left_height(20.0), profile.right_height(20.0));
    }

    #[test]
    fn test_sample_radius_scales_with_height() {
        let p = params();
        assert_eq!(p.sample_radius(50), 10);
        assert_eq!(p.sample_radius(25), 5);
        let flat = GradientParams {
            peak_height: 0,
            ..p
        };
        assert_eq!(flat.sample_radius(50), 0);
    }

    #[test]
    fn test_paint_is_lateral() {
        let mut field = HeightField::new(41, 41);
        let written = paint_sample(&mut field, &peak_point(20, 20, 0), &params(), MergeMode::Max);
        assert!(written > 0);
        assert!(field.get(20, 20).unwrap() > 0);
        // Heading north: cells straight ahead and behind stay unpainted.
        assert_eq!(field.get(20, 25), Some(0));
        assert_eq!(field.get(20, 15), Some(0));
        assert!(field.get(25, 20).unwrap() > 0);
        assert!(field.get(15, 20).unwrap() > 0);
    }

    #[test]
    fn test_zero_height_sample_is_skipped() {
        let mut field = HeightField::new(10, 10);
        let p = TerrainPoint::new(5, 5, 0);
        assert_eq!(paint_sample(&mut field, &p, &params(), MergeMode::Max), 0);
        assert!(field.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_paint_clips_at_edges() {
        let mut field = HeightField::new(8, 8);
        paint_sample(&mut field, &peak_point(0, 0, 0), &params(), MergeMode::Max);
        assert!(field.get(0, 0).unwrap() > 0);
    }

    #[test]
    fn test_max_merge_keeps_taller() {
        let mut field = HeightField::new(41, 41);
        paint_sample(&mut field, &peak_point(20, 20, 0), &params(), MergeMode::Max);
        let before = field.clone();
        let low = TerrainPoint {
            height: 10,
            ..TerrainPoint::new(20, 20, 0)
        };
        paint_sample(&mut field, &low, &params(), MergeMode::Max);
        assert_eq!(field, before);
    }

    #[test]
    fn test_overwrite_replaces() {
        let mut field = HeightField::filled(41, 41, 0);
        field.write(20, 20, 200, MergeMode::Overwrite);
        let low = TerrainPoint {
            height: 10,
            ..TerrainPoint::new(20, 20, 0)
        };
        paint_sample(&mut field, &low, &params(), MergeMode::Overwrite);
        assert!(field.get(20, 20).unwrap() < 200);
    }
}
