//! BC1 color block encoding, also used for the color half of BC3.

use crate::{
    color::Color565,
    encode::{
        common::{all_equal, mean},
        endpoints::{color_candidates, Candidates},
        indices::assign_colors,
        refine::{least_squares, refine, Fit, Solution},
        single_color::SingleColorTables,
    },
    pack::Bc1Block,
    palette::{Bc1Palette, TRANSPARENT_INDEX},
    settings::LevelSettings,
    Bc1ApproxMode,
};

/// Pixels darker than this in every channel count as black.
const BLACK_THRESHOLD: u8 = 4;

/// Format constraints of one color block.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ColorOptions {
    pub(crate) allow_3color: bool,
    pub(crate) black_is_transparent: bool,
    /// The decoder always builds a 4-color table, as it does for BC3.
    pub(crate) four_color_only: bool,
}

impl ColorOptions {
    fn transparent_mask(&self, pixels: &[[u8; 3]; 16]) -> u16 {
        if !self.allow_3color || !self.black_is_transparent || self.four_color_only {
            return 0;
        }

        pixels
            .iter()
            .enumerate()
            .filter(|(_, pixel)| pixel.iter().all(|&value| value < BLACK_THRESHOLD))
            .fold(0, |mask, (pixel, _)| mask | (1 << pixel))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Target {
    FourColor,
    ThreeColor,
}

/// Shared state of one block encode.
pub(crate) struct ColorContext<'a> {
    pub(crate) mode: Bc1ApproxMode,
    pub(crate) weights: [u32; 3],
    pub(crate) tables: &'a SingleColorTables,
}

struct ColorFit<'a> {
    pixels: &'a [[u8; 3]; 16],
    transparent: u16,
    target: Target,
    four_color_only: bool,
    mode: Bc1ApproxMode,
    weights: [u32; 3],
}

impl ColorFit<'_> {
    /// Orders a pair the way the target table requires.
    fn normalize(&self, (a, b): (Color565, Color565)) -> (Color565, Color565) {
        match self.target {
            Target::FourColor => (a.max(b), a.min(b)),
            Target::ThreeColor => (a.min(b), a.max(b)),
        }
    }

    fn palette(&self, (color0, color1): (Color565, Color565)) -> Bc1Palette {
        if self.target == Target::FourColor && color0 == color1 {
            Bc1Palette::solid(color0)
        } else {
            Bc1Palette::new(self.mode, color0, color1, self.four_color_only)
        }
    }

    fn interpolation_weight(&self, index: u8) -> Option<f32> {
        match (self.target, index) {
            (_, 0) => Some(0.0),
            (_, 1) => Some(1.0),
            (Target::FourColor, 2) => Some(1.0 / 3.0),
            (Target::FourColor, _) => Some(2.0 / 3.0),
            (Target::ThreeColor, 2) => Some(0.5),
            (Target::ThreeColor, _) => None,
        }
    }
}

impl Fit for ColorFit<'_> {
    type Endpoints = (Color565, Color565);

    fn evaluate(&self, endpoints: Self::Endpoints) -> Option<Solution<Self::Endpoints>> {
        let endpoints = self.normalize(endpoints);
        let palette = self.palette(endpoints);
        let (indices, error) =
            assign_colors(self.pixels, self.transparent, &palette, self.weights)?;

        Some(Solution {
            endpoints,
            indices,
            error,
        })
    }

    fn refit(&self, solution: &Solution<Self::Endpoints>) -> Self::Endpoints {
        let samples = self
            .pixels
            .iter()
            .zip(solution.indices.iter())
            .enumerate()
            .filter(|(pixel, _)| self.transparent & (1 << pixel) == 0)
            .filter_map(|(_, (color, &index))| {
                let t = self.interpolation_weight(index)?;
                Some((t, color.map(|value| value as f32)))
            });

        match least_squares(samples) {
            Some((c0, c1)) => self.normalize((
                Color565::from_rgb_f32(c0),
                Color565::from_rgb_f32(c1),
            )),
            None => solution.endpoints,
        }
    }

    fn for_each_neighbor(&self, (c0, c1): Self::Endpoints, visit: &mut dyn FnMut(Self::Endpoints)) {
        for channel in 0..3 {
            for delta in [-1, 1] {
                if let Some(moved) = c0.offset(channel, delta) {
                    visit((moved, c1));
                }
                if let Some(moved) = c1.offset(channel, delta) {
                    visit((c0, moved));
                }
                if let (Some(a), Some(b)) = (c0.offset(channel, delta), c1.offset(channel, delta)) {
                    visit((a, b));
                }
            }
        }
    }
}

/// A valid block with both endpoints at `color`: opaque pixels decode to it, pixels set in
/// `transparent` decode to transparent black.
fn solid_block(color: Color565, transparent: u16) -> Bc1Block {
    let mut indices = [0u8; 16];
    for (pixel, index) in indices.iter_mut().enumerate() {
        if transparent & (1 << pixel) != 0 {
            *index = TRANSPARENT_INDEX;
        }
    }

    Bc1Block {
        color0: color,
        color1: color,
        indices,
    }
}

/// Encodes the RGB part of 16 pixels.
///
/// Pixels designated as transparent black are only encoded transparent, never any other pixel.
/// When such pixels exist the block must use the 3-color table, otherwise the 4-color table is
/// used. Among all candidates the lowest error wins, earlier candidates winning ties.
pub(crate) fn encode_color_block(
    pixels: &[[u8; 3]; 16],
    options: ColorOptions,
    settings: &LevelSettings,
    context: &ColorContext<'_>,
) -> Bc1Block {
    let transparent = options.transparent_mask(pixels);
    if transparent == u16::MAX {
        return Bc1Block::TRANSPARENT;
    }

    let mut opaque = [[0u8; 3]; 16];
    let mut count = 0;
    for (pixel, color) in pixels.iter().enumerate() {
        if transparent & (1 << pixel) == 0 {
            opaque[count] = *color;
            count += 1;
        }
    }
    let opaque = &opaque[..count];

    let target = if transparent == 0 {
        Target::FourColor
    } else {
        Target::ThreeColor
    };

    let fit = ColorFit {
        pixels,
        transparent,
        target,
        four_color_only: options.four_color_only,
        mode: context.mode,
        weights: context.weights,
    };

    let candidates = if all_equal(opaque) {
        let color = opaque[0];
        let mut candidates = Candidates::new();
        let exact = Color565::from_rgb(color);
        candidates.push((exact, exact));
        candidates.push(match target {
            Target::FourColor => context.tables.four_color(color),
            Target::ThreeColor => context.tables.three_color(color),
        });
        candidates
    } else {
        color_candidates(opaque, settings)
    };

    let mut best: Option<Solution<(Color565, Color565)>> = None;
    for pair in candidates.iter() {
        let Some(start) = fit.evaluate(pair) else {
            continue;
        };

        let refined = refine(&fit, start, settings.refine_steps, settings.perturb);
        best = Some(match best {
            Some(best) => best.better(refined),
            None => refined,
        });
    }

    match best {
        Some(solution) => Bc1Block {
            color0: solution.endpoints.0,
            color1: solution.endpoints.1,
            indices: solution.indices,
        },
        None => solid_block(Color565::from_rgb_f32(mean(opaque)), transparent),
    }
}
