//! Starting endpoint pairs for BC1 color blocks.

use crate::{
    color::Color565,
    encode::common::{color_distance, covariance, luma, mean, sq},
    settings::LevelSettings,
};

const MAX_CANDIDATES: usize = 9;

const POWER_ITERATIONS: usize = 8;

/// A small set of distinct endpoint pairs, kept in generation order.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Candidates {
    pairs: [(Color565, Color565); MAX_CANDIDATES],
    len: usize,
}

impl Candidates {
    pub(crate) const fn new() -> Self {
        Self {
            pairs: [(Color565::BLACK, Color565::BLACK); MAX_CANDIDATES],
            len: 0,
        }
    }

    /// Adds a pair unless it, or its swapped form, is already present.
    pub(crate) fn push(&mut self, pair: (Color565, Color565)) {
        let duplicate = self
            .iter()
            .any(|(a, b)| (a, b) == pair || (b, a) == pair);

        if !duplicate && self.len < MAX_CANDIDATES {
            self.pairs[self.len] = pair;
            self.len += 1;
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (Color565, Color565)> + '_ {
        self.pairs[..self.len].iter().copied()
    }
}

fn quantized(a: [f32; 3], b: [f32; 3]) -> (Color565, Color565) {
    (Color565::from_rgb_f32(a), Color565::from_rgb_f32(b))
}

fn to_f32(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(|value| value as f32)
}

fn ssymv(covar: &[f32; 6], vector: &[f32; 3]) -> [f32; 3] {
    [
        covar[0] * vector[0] + covar[1] * vector[1] + covar[2] * vector[2],
        covar[1] * vector[0] + covar[3] * vector[1] + covar[4] * vector[2],
        covar[2] * vector[0] + covar[4] * vector[1] + covar[5] * vector[2],
    ]
}

/// Dominant eigenvector of the covariance matrix by power iteration.
///
/// Starts from the column of the channel with the largest variance. A fixed start vector like
/// `[1, 1, 1]` is orthogonal to the principal axis of many two-color blocks.
fn principal_axis(covar: &[f32; 6]) -> Option<[f32; 3]> {
    let diagonal = [covar[0], covar[3], covar[5]];
    let dominant = (0..3)
        .max_by(|&a, &b| diagonal[a].total_cmp(&diagonal[b]))
        .unwrap_or(0);

    let mut axis = match dominant {
        0 => [covar[0], covar[1], covar[2]],
        1 => [covar[1], covar[3], covar[4]],
        _ => [covar[2], covar[4], covar[5]],
    };

    for _ in 0..POWER_ITERATIONS {
        let norm_sq = axis.iter().map(|&value| sq(value)).sum::<f32>();
        if norm_sq <= f32::EPSILON {
            return None;
        }

        let rnorm = norm_sq.sqrt().recip();
        axis = ssymv(covar, &axis.map(|value| value * rnorm));
    }

    let norm_sq = axis.iter().map(|&value| sq(value)).sum::<f32>();
    (norm_sq > f32::EPSILON).then_some(axis)
}

/// Extremes of the projection of the pixels onto the principal axis.
fn principal_extremes(pixels: &[[u8; 3]], dc: &[f32; 3]) -> ([f32; 3], [f32; 3]) {
    let covar = covariance(pixels, dc);
    let Some(axis) = principal_axis(&covar) else {
        return (*dc, *dc);
    };

    let mut min_dot = f32::MAX;
    let mut max_dot = f32::MIN;
    for pixel in pixels {
        let dot = (0..3)
            .map(|p| (pixel[p] as f32 - dc[p]) * axis[p])
            .sum::<f32>();

        min_dot = min_dot.min(dot);
        max_dot = max_dot.max(dot);
    }

    let rnorm_sq = axis.iter().map(|&value| sq(value)).sum::<f32>().recip();

    let mut c0 = [0.0; 3];
    let mut c1 = [0.0; 3];
    for p in 0..3 {
        c0[p] = (dc[p] + max_dot * rnorm_sq * axis[p]).clamp(0.0, 255.0);
        c1[p] = (dc[p] + min_dot * rnorm_sq * axis[p]).clamp(0.0, 255.0);
    }

    (c0, c1)
}

fn bounding_box(pixels: &[[u8; 3]]) -> ([u8; 3], [u8; 3]) {
    let mut max = [0u8; 3];
    let mut min = [255u8; 3];
    for pixel in pixels {
        for p in 0..3 {
            max[p] = max[p].max(pixel[p]);
            min[p] = min[p].min(pixel[p]);
        }
    }

    (max, min)
}

fn farthest_pair(pixels: &[[u8; 3]]) -> ([u8; 3], [u8; 3]) {
    let mut best = (pixels[0], pixels[0]);
    let mut best_distance = 0;

    for (i, a) in pixels.iter().enumerate() {
        for b in &pixels[i + 1..] {
            let distance = color_distance(*a, *b, [1; 3]);
            if distance > best_distance {
                best_distance = distance;
                best = (*a, *b);
            }
        }
    }

    best
}

/// Generates the starting endpoint pairs of a non-uniform block for the given level.
///
/// The set only grows with the level. `pixels` must not be empty.
pub(crate) fn color_candidates(pixels: &[[u8; 3]], settings: &LevelSettings) -> Candidates {
    debug_assert!(!pixels.is_empty());

    let mut candidates = Candidates::new();
    let dc = mean(pixels);

    let (c0, c1) = principal_extremes(pixels, &dc);
    candidates.push(quantized(c0, c1));

    let average = Color565::from_rgb_f32(dc);
    candidates.push((average, average));

    let (max, min) = bounding_box(pixels);
    if settings.bounding_box {
        candidates.push((Color565::from_rgb(max), Color565::from_rgb(min)));
    }

    if settings.luma_extremes {
        let brightest = pixels.iter().copied().max_by_key(|&pixel| luma(pixel));
        let darkest = pixels.iter().copied().min_by_key(|&pixel| luma(pixel));
        if let (Some(brightest), Some(darkest)) = (brightest, darkest) {
            candidates.push((Color565::from_rgb(brightest), Color565::from_rgb(darkest)));
        }
    }

    if settings.inset {
        let mut high = to_f32(max);
        let mut low = to_f32(min);
        for p in 0..3 {
            let inset = (high[p] - low[p]) / 16.0;
            high[p] -= inset;
            low[p] += inset;
        }
        candidates.push(quantized(high, low));
    }

    if settings.farthest_pair {
        let (a, b) = farthest_pair(pixels);
        candidates.push((Color565::from_rgb(a), Color565::from_rgb(b)));
    }

    if settings.box_diagonals {
        for flip in 0..3 {
            let mut high = max;
            let mut low = min;
            high[flip] = min[flip];
            low[flip] = max[flip];
            candidates.push((Color565::from_rgb(high), Color565::from_rgb(low)));
        }
    }

    candidates
}
