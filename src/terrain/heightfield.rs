//! Column-major 8-bit height raster and its merge policies.

use serde::{Deserialize, Serialize};

/// How a painted height is combined with the stored sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergeMode {
    /// Keep the taller of the two, measured above the field's floor.
    #[default]
    Max,
    /// Replace the stored sample.
    Overwrite,
}

/// A `width × height` raster of 8-bit samples.
///
/// Sample `(x, y)` lives at index `x * height + y`. Writes outside the raster
/// are dropped, and stored values saturate to `0..=255`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightField {
    width: u32,
    height: u32,
    /// Baseline every painted height is stored on top of.
    floor: u8,
    samples: Vec<u8>,
}

impl HeightField {
    /// Creates a field of zeros.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Creates a field where every sample, and the floor, is `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            floor: value,
            samples: vec![value; size],
        }
    }

    /// Wraps existing samples. Returns `None` if the length does not match.
    pub fn from_samples(width: u32, height: u32, samples: Vec<u8>) -> Option<Self> {
        if samples.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            floor: 0,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// Raster index of `(x, y)`, or `None` when out of range.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(x as usize * self.height as usize + y as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.samples[i])
    }

    /// Paints `value` (relative to the floor) at `(x, y)`.
    ///
    /// Returns whether the stored sample changed hands; out-of-range writes
    /// and losing max-merge writes return `false`.
    pub fn write(&mut self, x: i32, y: i32, value: i32, mode: MergeMode) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        let floor = self.floor as i32;
        let accept = match mode {
            MergeMode::Max => value > self.samples[i] as i32 - floor,
            MergeMode::Overwrite => true,
        };
        if accept {
            self.samples[i] = saturate(value + floor);
        }
        accept
    }

    /// Adds `other` sample-wise, saturating at 255. Ignored on size mismatch.
    pub fn add_field(&mut self, other: &HeightField) {
        if other.len() != self.len() {
            log::debug!(
                "skipping field add: {} samples vs {}",
                other.len(),
                self.len()
            );
            return;
        }
        for (dst, &src) in self.samples.iter_mut().zip(&other.samples) {
            *dst = dst.saturating_add(src);
        }
    }

    /// Smallest and largest stored sample.
    pub fn height_range(&self) -> (u8, u8) {
        self.samples
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)))
    }
}

/// Element-wise maximum of two fields of equal sample count.
///
/// Returns `a` untouched when the sample counts differ.
pub fn combine(mut a: HeightField, b: &HeightField) -> HeightField {
    if a.len() != b.len() {
        log::debug!("combine size mismatch ({} vs {}), keeping first field", a.len(), b.len());
        return a;
    }
    for (dst, &src) in a.samples.iter_mut().zip(&b.samples) {
        *dst = (*dst).max(src);
    }
    a
}

#[inline]
fn saturate(value: i32) -> u8 {
    value.clamp(0, u8::MAX as i32) as u8
}

/// Maps `value` from `[min, max]` onto `0..=255`.
///
/// Values outside the range saturate; an empty range maps to 0.
pub fn map_to_8bit(value: f32, min: f32, max: f32) -> u8 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return 0;
    }
    (255.0 * ((value - min) / span)).clamp(0.0, 255.0) as u8
}

/// Rescales `value` by the ratio of the output span to the input span.
///
/// Only the span widths matter: `round((out_max - out_min) * value / (in_max - in_min))`.
/// An empty input span maps to 0.
pub fn map_float_to_int(value: f32, in_min: f32, in_max: f32, out_min: i32, out_max: i32) -> i32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return 0;
    }
    ((out_max - out_min) as f32 * (value / span)).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_major_index() {
        let field = HeightField::new(4, 3);
        assert_eq!(field.index(0, 0), Some(0));
        assert_eq!(field.index(0, 2), Some(2));
        assert_eq!(field.index(1, 0), Some(3));
        assert_eq!(field.index(3, 2), Some(11));
        assert_eq!(field.index(4, 0), None);
        assert_eq!(field.index(0, -1), None);
    }

    #[test]
    fn test_out_of_range_write_is_dropped() {
        let mut field = HeightField::new(2, 2);
        assert!(!field.write(-1, 0, 10, MergeMode::Overwrite));
        assert!(!field.write(0, 2, 10, MergeMode::Max));
        assert!(field.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_max_merge_is_relative_to_floor() {
        let mut field = HeightField::filled(3, 3, 50);
        assert!(field.write(1, 1, 20, MergeMode::Max));
        assert_eq!(field.get(1, 1), Some(70));
        assert!(!field.write(1, 1, 15, MergeMode::Max));
        assert_eq!(field.get(1, 1), Some(70));
        assert!(field.write(1, 1, 30, MergeMode::Max));
        assert_eq!(field.get(1, 1), Some(80));
    }

    #[test]
    fn test_overwrite_replaces_taller() {
        let mut field = HeightField::new(2, 2);
        field.write(0, 0, 100, MergeMode::Max);
        field.write(0, 0, 5, MergeMode::Overwrite);
        assert_eq!(field.get(0, 0), Some(5));
    }

    #[test]
    fn test_write_saturates() {
        let mut field = HeightField::filled(1, 1, 200);
        field.write(0, 0, 500, MergeMode::Max);
        assert_eq!(field.get(0, 0), Some(255));
        field.write(0, 0, -500, MergeMode::Overwrite);
        assert_eq!(field.get(0, 0), Some(0));
    }

    #[test]
    fn test_add_field_saturates() {
        let mut a = HeightField::filled(2, 1, 200);
        let b = HeightField::filled(2, 1, 100);
        a.add_field(&b);
        assert_eq!(a.samples(), &[255, 255]);

        let mut c = HeightField::filled(2, 1, 1);
        c.add_field(&HeightField::filled(3, 1, 1));
        assert_eq!(c.samples(), &[1, 1]);
    }

    #[test]
    fn test_combine_size_mismatch_returns_first() {
        let a = HeightField::filled(2, 2, 7);
        let b = HeightField::filled(3, 2, 200);
        assert_eq!(combine(a.clone(), &b), a);
    }

    #[test]
    fn test_height_range() {
        let field = HeightField::from_samples(2, 2, vec![4, 9, 1, 6]).unwrap();
        assert_eq!(field.height_range(), (1, 9));
        assert!(HeightField::from_samples(2, 2, vec![0; 3]).is_none());
    }

    #[test]
    fn test_map_to_8bit() {
        assert_eq!(map_to_8bit(-1.0, -1.0, 1.0), 0);
        assert_eq!(map_to_8bit(1.0, -1.0, 1.0), 255);
        assert_eq!(map_to_8bit(0.0, -1.0, 1.0), 127);
        assert_eq!(map_to_8bit(3.0, -1.0, 1.0), 255);
        assert_eq!(map_to_8bit(0.5, 1.0, 1.0), 0);
    }

    #[test]
    fn test_map_float_to_int() {
        assert_eq!(map_float_to_int(0.5, 0.0, 1.0, 0, 100), 50);
        assert_eq!(map_float_to_int(-0.25, -1.0, 1.0, 0, 255), -32);
        assert_eq!(map_float_to_int(1.0, 2.0, 2.0, 0, 10), 0);
    }

    proptest! {
        #[test]
        fn test_combine_is_elementwise_max(
            pairs in proptest::collection::vec((any::<u8>(), any::<u8>()), 1..64)
        ) {
            let (xs, ys): (Vec<u8>, Vec<u8>) = pairs.into_iter().unzip();
            let n = xs.len() as u32;
            let a = HeightField::from_samples(n, 1, xs.clone()).unwrap();
            let b = HeightField::from_samples(n, 1, ys.clone()).unwrap();
            let c = combine(a, &b);
            for i in 0..xs.len() {
                prop_assert_eq!(c.samples()[i], xs[i].max(ys[i]));
            }
        }
    }
}
