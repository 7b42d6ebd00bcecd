//! Improved Perlin lattice noise.

use super::permutation::PermutationTable;

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
pub fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

/// Dot product of one of 12 edge gradients (picked by the low 4 hash bits)
/// with the offset vector.
#[inline]
pub fn grad(hash: usize, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

/// Evaluates a single octave of Perlin noise at `(x, y, z)`.
///
/// Output lies roughly in [-1, 1].
pub fn perlin_3d(table: &PermutationTable, x: f32, y: f32, z: f32) -> f32 {
    let xi = (x.floor() as i32 & 255) as usize;
    let yi = (y.floor() as i32 & 255) as usize;
    let zi = (z.floor() as i32 & 255) as usize;

    let x = x - x.floor();
    let y = y - y.floor();
    let z = z - z.floor();

    let u = fade(x);
    let v = fade(y);
    let w = fade(z);

    let a = table.get(xi) + yi;
    let aa = table.get(a) + zi;
    let ab = table.get(a + 1) + zi;
    let b = table.get(xi + 1) + yi;
    let ba = table.get(b) + zi;
    let bb = table.get(b + 1) + zi;

    lerp(
        w,
        lerp(
            v,
            lerp(
                u,
                grad(table.get(aa), x, y, z),
                grad(table.get(ba), x - 1.0, y, z),
            ),
            lerp(
                u,
                grad(table.get(ab), x, y - 1.0, z),
                grad(table.get(bb), x - 1.0, y - 1.0, z),
            ),
        ),
        lerp(
            v,
            lerp(
                u,
                grad(table.get(aa + 1), x, y, z - 1.0),
                grad(table.get(ba + 1), x - 1.0, y, z - 1.0),
            ),
            lerp(
                u,
                grad(table.get(ab + 1), x, y - 1.0, z - 1.0),
                grad(table.get(bb + 1), x - 1.0, y - 1.0, z - 1.0),
            ),
        ),
    )
}
