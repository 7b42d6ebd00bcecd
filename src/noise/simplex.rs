//! 3D simplex noise.

use super::perlin::grad;
use super::permutation::PermutationTable;

const F3: f32 = 1.0 / 3.0;
const G3: f32 = 1.0 / 6.0;

/// `(0.6 - r^2)^4 * dot(gradient, offset)`, or zero outside the kernel.
#[inline]
fn corner(gi: i32, x: f32, y: f32, z: f32) -> f32 {
    let t = 0.6 - x * x - y * y - z * z;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        t2 * t2 * grad(gi as usize, x, y, z)
    }
}

/// Evaluates a single octave of simplex noise at `(x, y, z)`.
///
/// Output is scaled by 32 to sit just inside [-1, 1].
pub fn simplex_3d(table: &PermutationTable, x: f32, y: f32, z: f32) -> f32 {
    let s = (x + y + z) * F3;
    let i = (x + s).floor();
    let j = (y + s).floor();
    let k = (z + s).floor();
    let t = (i + j + k) * G3;
    let x0 = x - (i - t);
    let y0 = y - (j - t);
    let z0 = z - (k - t);

    // Offsets of the second and third corners, chosen by ranking x0, y0, z0.
    let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
        if y0 >= z0 {
            (1, 0, 0, 1, 1, 0)
        } else if x0 >= z0 {
            (1, 0, 0, 1, 0, 1)
        } else {
            (0, 0, 1, 1, 0, 1)
        }
    } else if y0 < z0 {
        (0, 0, 1, 0, 1, 1)
    } else if x0 < z0 {
        (0, 1, 0, 0, 1, 1)
    } else {
        (0, 1, 0, 1, 1, 0)
    };

    let x1 = x0 - i1 as f32 + G3;
    let y1 = y0 - j1 as f32 + G3;
    let z1 = z0 - k1 as f32 + G3;
    let x2 = x0 - i2 as f32 + 2.0 * G3;
    let y2 = y0 - j2 as f32 + 2.0 * G3;
    let z2 = z0 - k2 as f32 + 2.0 * G3;
    let x3 = x0 - 1.0 + 3.0 * G3;
    let y3 = y0 - 1.0 + 3.0 * G3;
    let z3 = z0 - 1.0 + 3.0 * G3;

    // Hashing only sees the low byte, so reduce before summing.
    let (i, j, k) = (i as i32 & 255, j as i32 & 255, k as i32 & 255);
    let hash = |a: i32| table.hash(a);
    let gi0 = hash(i + hash(j + hash(k)));
    let gi1 = hash(i + i1 + hash(j + j1 + hash(k + k1)));
    let gi2 = hash(i + i2 + hash(j + j2 + hash(k + k2)));
    let gi3 = hash(i + 1 + hash(j + 1 + hash(k + 1)));

    let n0 = corner(gi0, x0, y0, z0);
    let n1 = corner(gi1, x1, y1, z1);
    let n2 = corner(gi2, x2, y2, z2);
    let n3 = corner(gi3, x3, y3, z3);

    32.0 * (n0 + n1 + n2 + n3)
}
