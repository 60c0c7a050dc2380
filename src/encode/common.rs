#[inline(always)]
pub(crate) const fn sq(x: f32) -> f32 {
    x * x
}

#[inline(always)]
pub(crate) const fn sq_diff(a: u8, b: u8) -> u32 {
    let diff = a as i32 - b as i32;
    (diff * diff) as u32
}

/// Weighted squared distance of two colors.
#[inline(always)]
pub(crate) fn color_distance(a: [u8; 3], b: [u8; 3], weights: [u32; 3]) -> u64 {
    sq_diff(a[0], b[0]) as u64 * weights[0] as u64
        + sq_diff(a[1], b[1]) as u64 * weights[1] as u64
        + sq_diff(a[2], b[2]) as u64 * weights[2] as u64
}

/// Integer Rec. 601 luma, scaled by 256.
#[inline(always)]
pub(crate) const fn luma(rgb: [u8; 3]) -> u32 {
    rgb[0] as u32 * 77 + rgb[1] as u32 * 150 + rgb[2] as u32 * 29
}

pub(crate) fn mean(pixels: &[[u8; 3]]) -> [f32; 3] {
    let mut sum = [0.0f32; 3];
    for pixel in pixels {
        for (acc, &value) in sum.iter_mut().zip(pixel.iter()) {
            *acc += value as f32;
        }
    }

    let count = pixels.len().max(1) as f32;
    sum.map(|acc| acc / count)
}

/// Upper triangle of the covariance matrix: `[rr, rg, rb, gg, gb, bb]`.
pub(crate) fn covariance(pixels: &[[u8; 3]], dc: &[f32; 3]) -> [f32; 6] {
    let mut covar = [0.0f32; 6];

    for pixel in pixels {
        let r = pixel[0] as f32 - dc[0];
        let g = pixel[1] as f32 - dc[1];
        let b = pixel[2] as f32 - dc[2];

        covar[0] += r * r;
        covar[1] += r * g;
        covar[2] += r * b;
        covar[3] += g * g;
        covar[4] += g * b;
        covar[5] += b * b;
    }

    covar
}

pub(crate) fn all_equal<T: PartialEq>(values: &[T]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}
