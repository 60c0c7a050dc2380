//! BC4 single channel encoding, also used for the alpha of BC3 and both channels of BC5.

use crate::{
    encode::{
        common::all_equal,
        indices::assign_values,
        refine::{least_squares, refine, Fit, Solution},
    },
    pack::Bc4Block,
    palette::bc4_palette,
};

const REFINE_STEPS: u32 = 8;

struct ScalarFit<'a> {
    values: &'a [u8; 16],
}

impl ScalarFit<'_> {
    /// Position of an index between the two endpoints, `None` for the fixed 0 and 255 entries.
    fn interpolation_weight((alpha0, alpha1): (u8, u8), index: u8) -> Option<f32> {
        match index {
            0 => Some(0.0),
            1 => Some(1.0),
            _ if alpha0 > alpha1 => Some((index - 1) as f32 / 7.0),
            2..=5 => Some((index - 1) as f32 / 5.0),
            _ => None,
        }
    }
}

impl Fit for ScalarFit<'_> {
    type Endpoints = (u8, u8);

    fn evaluate(&self, endpoints: (u8, u8)) -> Option<Solution<(u8, u8)>> {
        let palette = bc4_palette(endpoints.0, endpoints.1);
        let (indices, error) = assign_values(self.values, &palette);

        Some(Solution {
            endpoints,
            indices,
            error,
        })
    }

    fn refit(&self, solution: &Solution<(u8, u8)>) -> (u8, u8) {
        let samples = self
            .values
            .iter()
            .zip(solution.indices.iter())
            .filter_map(|(&value, &index)| {
                let t = Self::interpolation_weight(solution.endpoints, index)?;
                Some((t, [value as f32]))
            });

        match least_squares(samples) {
            Some(([a], [b])) => (
                a.clamp(0.0, 255.0).round() as u8,
                b.clamp(0.0, 255.0).round() as u8,
            ),
            None => solution.endpoints,
        }
    }

    fn for_each_neighbor(&self, (a0, a1): (u8, u8), visit: &mut dyn FnMut((u8, u8))) {
        for delta in [-1i16, 1] {
            let moved0 = u8::try_from(a0 as i16 + delta).ok();
            let moved1 = u8::try_from(a1 as i16 + delta).ok();

            if let Some(moved0) = moved0 {
                visit((moved0, a1));
            }
            if let Some(moved1) = moved1 {
                visit((a0, moved1));
            }
            if let (Some(moved0), Some(moved1)) = (moved0, moved1) {
                visit((moved0, moved1));
            }
        }
    }
}

/// Encodes 16 scalar values.
///
/// Tries both gradient layouts: 8 steps between the extremes, and 6 steps between the values
/// that are not already covered by the fixed 0 and 255 entries.
pub(crate) fn encode_scalar_block(values: &[u8; 16]) -> Bc4Block {
    if all_equal(values) {
        return Bc4Block {
            alpha0: values[0],
            alpha1: values[0],
            indices: [0; 16],
        };
    }

    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(255);
    let average = (values.iter().map(|&value| value as u32).sum::<u32>() + 8) / 16;

    let mut candidates = [(max, min), (min, max), (min, max), (average as u8, average as u8)];
    let inner = values.iter().copied().filter(|&value| value != 0 && value != 255);
    if let (Some(low), Some(high)) = (inner.clone().min(), inner.max()) {
        candidates[2] = (low, high);
    }

    let fit = ScalarFit { values };
    let mut best: Option<Solution<(u8, u8)>> = None;
    for (position, &pair) in candidates.iter().enumerate() {
        if candidates[..position].contains(&pair) {
            continue;
        }

        let Some(start) = fit.evaluate(pair) else {
            continue;
        };

        let refined = refine(&fit, start, REFINE_STEPS, true);
        best = Some(match best {
            Some(best) => best.better(refined),
            None => refined,
        });
    }

    match best {
        Some(solution) => Bc4Block {
            alpha0: solution.endpoints.0,
            alpha1: solution.endpoints.1,
            indices: solution.indices,
        },
        None => Bc4Block {
            alpha0: max,
            alpha1: min,
            indices: assign_values(values, &bc4_palette(max, min)).0,
        },
    }
}
