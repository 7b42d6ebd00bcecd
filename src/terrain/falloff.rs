//! Closed-form falloff curves used by the gradient painter.
//!
//! Every fitting helper returns 0 for a zero denominator instead of
//! producing infinities.

/// `a·x² + c`, truncated.
#[inline]
pub fn parabola(a: f32, c: f32, x: f32) -> i32 {
    (a * x * x + c) as i32
}

/// Curvature of a downward parabola with apex `c` reaching 0 at `x_max`.
#[inline]
pub fn parabola_a(c: f32, x_max: f32) -> f32 {
    if x_max == 0.0 {
        return 0.0;
    }
    -c / (x_max * x_max)
}

/// `b·a^x`, truncated.
#[inline]
pub fn exp_decay(a: f32, b: f32, x: f32) -> i32 {
    (b * a.powf(x)) as i32
}

/// Base `a` such that `b·a^x_max == y`.
#[inline]
pub fn exp_decay_a(b: f32, x_max: f32, y: f32) -> f32 {
    if b == 0.0 || x_max == 0.0 {
        return 0.0;
    }
    (y / b).powf(1.0 / x_max)
}

/// `m·x + c`, truncated.
#[inline]
pub fn linear(m: f32, x: f32, c: f32) -> i32 {
    (m * x + c) as i32
}

/// Slope `modifier·c/x_max`.
#[inline]
pub fn linear_m(c: f32, x_max: f32, modifier: f32) -> f32 {
    if x_max == 0.0 {
        return 0.0;
    }
    modifier * (c / x_max)
}

/// The `x` at which `m·x + c` reaches `y`.
#[inline]
pub fn linear_x(m: f32, c: f32, y: f32) -> f32 {
    if m == 0.0 {
        return 0.0;
    }
    (y - c) / m
}
