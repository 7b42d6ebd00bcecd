//! Midpoint-displacement height profile along a skeleton path.

use rand::Rng;

use crate::skeleton::SkeletonPath;

/// Control point of the subdivision: a path index and its height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidpointSample {
    pub index: usize,
    pub height: i32,
}

impl MidpointSample {
    pub fn new(index: usize, height: i32) -> Self {
        Self { index, height }
    }
}

/// Shape of a rise-to-peak-and-fall profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileParams {
    pub peak_height: i32,
    pub peak_index: usize,
    /// Jitter magnitude before the first round's decay.
    pub displacement: f32,
    pub iterations: u32,
    /// Jitter decays by `2^-smoothness` each round.
    pub smoothness: f32,
}

/// Assigns heights along `path`: 0 at index 0, `peak_height` at
/// `peak_index`, 0 at the last index, jittered in between.
///
/// The rising half runs first, then the falling half, each drawing from
/// `rng`. `peak_index` is clamped to the path; where it coincides with an
/// end, the peak height wins.
///
/// # Arguments
/// * `path` - Skeleton samples whose heights are overwritten
/// * `params` - Peak height and index, jitter magnitude, rounds and smoothness
/// * `rng` - Stream the jitter signs draw from
pub fn profile_heights<R: Rng + ?Sized>(
    path: &mut SkeletonPath,
    params: &ProfileParams,
    rng: &mut R,
) {
    if path.is_empty() {
        return;
    }
    let last = path.len() - 1;
    let peak = params.peak_index.min(last);
    let rising = [
        MidpointSample::new(0, 0),
        MidpointSample::new(peak, params.peak_height),
    ];
    let falling = [
        MidpointSample::new(peak, params.peak_height),
        MidpointSample::new(last, 0),
    ];

    for [start, end] in [rising, falling] {
        if end.index <= start.index {
            continue;
        }
        let controls = subdivide(start, end, params, rng);
        fill_between(path, &controls);
    }
    path[peak].height = params.peak_height;
}

/// Inserts jittered midpoints between `start` and `end` for at most
/// `log2(span length)` rounds.
pub fn subdivide<R: Rng + ?Sized>(
    start: MidpointSample,
    end: MidpointSample,
    params: &ProfileParams,
    rng: &mut R,
) -> Vec<MidpointSample> {
    let span_len = (end.index - start.index + 1) as u32;
    let rounds = params.iterations.min(span_len.ilog2());
    let decay = 2f32.powf(-params.smoothness);

    let mut controls = vec![start, end];
    let mut displacement = params.displacement;
    for _ in 0..rounds {
        displacement *= decay;
        let mut next = Vec::with_capacity(controls.len() * 2);
        for pair in controls.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            next.push(a);
            let mid = (a.index + b.index) / 2;
            if mid != a.index {
                let sign = if rng.gen_range(0..=1) == 0 { -1.0 } else { 1.0 };
                let base = interpolate(a, b, mid);
                next.push(MidpointSample::new(mid, (base + displacement * sign).round() as i32));
            }
        }
        if let Some(&tail) = controls.last() {
            next.push(tail);
        }
        controls = next;
    }
    controls
}

fn interpolate(a: MidpointSample, b: MidpointSample, index: usize) -> f32 {
    if b.index == a.index {
        return a.height as f32;
    }
    let t = (index - a.index) as f32 / (b.index - a.index) as f32;
    a.height as f32 + t * (b.height - a.height) as f32
}

fn fill_between(path: &mut SkeletonPath, controls: &[MidpointSample]) {
    for pair in controls.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        for k in a.index..=b.index {
            path[k].height = interpolate(a, b, k).round() as i32;
        }
    }
}
