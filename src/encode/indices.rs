//! Nearest-entry index assignment.

use crate::{
    encode::common::{color_distance, sq_diff},
    palette::{Bc1Palette, TRANSPARENT_INDEX},
};

/// Maps every pixel to its closest opaque table entry, ties going to the lower index.
///
/// Pixels set in `transparent` take the transparent entry. Returns `None` if the table has no
/// transparent entry but such pixels exist.
pub(crate) fn assign_colors(
    pixels: &[[u8; 3]; 16],
    transparent: u16,
    palette: &Bc1Palette,
    weights: [u32; 3],
) -> Option<([u8; 16], u64)> {
    if transparent != 0 && !palette.transparent {
        return None;
    }

    let mut indices = [0u8; 16];
    let mut total = 0u64;

    for (pixel, (index, color)) in indices.iter_mut().zip(pixels.iter()).enumerate() {
        if transparent & (1 << pixel) != 0 {
            *index = TRANSPARENT_INDEX;
            continue;
        }

        let mut best_index = 0;
        let mut best_error = u64::MAX;
        for (entry, candidate) in palette.colors[..palette.opaque].iter().enumerate() {
            let error = color_distance(*color, *candidate, weights);
            if error < best_error {
                best_error = error;
                best_index = entry as u8;
            }
        }

        *index = best_index;
        total += best_error;
    }

    Some((indices, total))
}

/// Scalar analogue of [`assign_colors`] over all 8 gradient entries.
pub(crate) fn assign_values(values: &[u8; 16], palette: &[u8; 8]) -> ([u8; 16], u64) {
    let mut indices = [0u8; 16];
    let mut total = 0u64;

    for (index, &value) in indices.iter_mut().zip(values.iter()) {
        let mut best_index = 0;
        let mut best_error = u32::MAX;
        for (entry, &candidate) in palette.iter().enumerate() {
            let error = sq_diff(value, candidate);
            if error < best_error {
                best_error = error;
                best_index = entry as u8;
            }
        }

        *index = best_index;
        total += best_error as u64;
    }

    (indices, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::Color565, palette::bc4_palette, Bc1ApproxMode};

    #[test]
    fn ties_prefer_lower_index() {
        let palette = [10, 10, 10, 10, 10, 10, 10, 10];
        let (indices, error) = assign_values(&[10; 16], &palette);
        assert_eq!(indices, [0; 16]);
        assert_eq!(error, 0);
    }

    #[test]
    fn values_pick_closest_entry() {
        let palette = bc4_palette(255, 0);
        let mut values = [0u8; 16];
        values[1] = 255;
        values[2] = 220;
        values[3] = 40;

        let (indices, error) = assign_values(&values, &palette);
        assert_eq!(indices[0], 1);
        assert_eq!(indices[1], 0);
        assert_eq!(indices[2], 2);
        assert_eq!(indices[3], 7);
        assert_eq!(error, 4 + 16);
    }

    #[test]
    fn transparent_pixels_need_a_transparent_entry() {
        let pixels = [[0u8; 3]; 16];
        let four = Bc1Palette::new(
            Bc1ApproxMode::Ideal,
            Color565(0xFFFF),
            Color565(0),
            false,
        );
        assert!(assign_colors(&pixels, 1, &four, [1; 3]).is_none());

        let three = Bc1Palette::new(
            Bc1ApproxMode::Ideal,
            Color565(0),
            Color565(0xFFFF),
            false,
        );
        let (indices, error) = assign_colors(&pixels, 0b101, &three, [1; 3]).unwrap();
        assert_eq!(indices[0], 3);
        assert_eq!(indices[1], 0);
        assert_eq!(indices[2], 3);
        assert_eq!(error, 0);
    }

    #[test]
    fn opaque_pixels_never_take_the_transparent_entry() {
        let pixels = [[0u8; 3]; 16];
        let three = Bc1Palette::new(
            Bc1ApproxMode::Ideal,
            Color565(0xFFFF),
            Color565(0xFFFF),
            false,
        );
        let (indices, _) = assign_colors(&pixels, 0, &three, [1; 3]).unwrap();
        assert!(indices.iter().all(|&index| index < 3));
    }
}
