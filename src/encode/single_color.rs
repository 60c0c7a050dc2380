//! Optimal endpoints for blocks of a single color.
//!
//! A color that is not on the RGB565 grid can often be hit exactly by an interpolated table
//! entry. These tables store, for every 8-bit value, the endpoint pair whose interpolated entry
//! comes closest to it. They depend on the approximation mode and are built once per encoder.

use crate::{
    color::Color565,
    palette::{blend_half, blend_two_thirds, ChannelDepth},
    Bc1ApproxMode,
};

/// Channel values of the two endpoints, in the order they are stored in the block.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
struct Match {
    color0: u8,
    color1: u8,
}

#[derive(Clone, Debug)]
struct ChannelTable {
    five: [Match; 256],
    six: [Match; 256],
}

impl ChannelTable {
    /// `ordered` restricts the pairs to `color0 <= color1` in every channel, which keeps the
    /// whole endpoints in 3-color order.
    fn new(ordered: bool, blend: impl Fn(ChannelDepth, u8, u8) -> u8) -> Self {
        Self {
            five: build(ChannelDepth::Five, ordered, &blend),
            six: build(ChannelDepth::Six, ordered, &blend),
        }
    }

    fn lookup(&self, rgb: [u8; 3]) -> (Color565, Color565) {
        let r = self.five[rgb[0] as usize];
        let g = self.six[rgb[1] as usize];
        let b = self.five[rgb[2] as usize];

        (
            Color565::from_channels(r.color0, g.color0, b.color0),
            Color565::from_channels(r.color1, g.color1, b.color1),
        )
    }
}

fn build(
    depth: ChannelDepth,
    ordered: bool,
    blend: &impl Fn(ChannelDepth, u8, u8) -> u8,
) -> [Match; 256] {
    // Best pair per exactly reachable value, preferring endpoints close to each other.
    let mut exact: [Option<(Match, u8)>; 256] = [None; 256];
    for color0 in 0..=depth.max() {
        for color1 in 0..=depth.max() {
            if ordered && color0 > color1 {
                continue;
            }

            let value = blend(depth, color0, color1) as usize;
            let spread = color0.abs_diff(color1);
            if exact[value].map_or(true, |(_, best)| spread < best) {
                exact[value] = Some((Match { color0, color1 }, spread));
            }
        }
    }

    let mut table = [Match::default(); 256];
    for (value, entry) in table.iter_mut().enumerate() {
        *entry = (0..256)
            .flat_map(|distance| [value.checked_sub(distance), Some(value + distance)])
            .flatten()
            .filter(|&candidate| candidate < 256)
            .find_map(|candidate| exact[candidate].map(|(found, _)| found))
            .unwrap_or_default();
    }

    table
}

/// Single-color tables of one approximation mode.
#[derive(Clone, Debug)]
pub(crate) struct SingleColorTables {
    four_color: ChannelTable,
    three_color: ChannelTable,
}

impl SingleColorTables {
    pub(crate) fn new(mode: Bc1ApproxMode) -> Self {
        Self {
            four_color: ChannelTable::new(false, |depth, color0, color1| {
                blend_two_thirds(mode, depth, color0, color1)
            }),
            three_color: ChannelTable::new(true, |depth, color0, color1| {
                blend_half(mode, depth, color0, color1)
            }),
        }
    }

    /// Endpoints whose two-thirds entry approximates `rgb`.
    pub(crate) fn four_color(&self, rgb: [u8; 3]) -> (Color565, Color565) {
        self.four_color.lookup(rgb)
    }

    /// Endpoints in 3-color order (`color0 <= color1`) whose midpoint entry approximates `rgb`.
    pub(crate) fn three_color(&self, rgb: [u8; 3]) -> (Color565, Color565) {
        self.three_color.lookup(rgb)
    }
}
