//! Interpolation tables shared by the encoder and the decoder.
//!
//! The encoder scores every candidate against exactly the table the decoder rebuilds from the
//! stored endpoints, so an emitted index can never point outside of it.

use crate::{
    color::{expand5, expand6, Color565},
    Bc1ApproxMode,
};

/// Index of the transparent entry in a 3-color BC1 table.
pub(crate) const TRANSPARENT_INDEX: u8 = 3;

/// Bit depth of one RGB565 channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ChannelDepth {
    Five,
    Six,
}

impl ChannelDepth {
    pub(crate) const RGB: [ChannelDepth; 3] =
        [ChannelDepth::Five, ChannelDepth::Six, ChannelDepth::Five];

    pub(crate) const fn max(self) -> u8 {
        match self {
            ChannelDepth::Five => 31,
            ChannelDepth::Six => 63,
        }
    }

    #[inline(always)]
    pub(crate) const fn expand(self, value: u8) -> u8 {
        match self {
            ChannelDepth::Five => expand5(value),
            ChannelDepth::Six => expand6(value),
        }
    }
}

/// Channel value of the entry two thirds of the way towards `q0` (index 2 of a 4-color table
/// when `q0` belongs to color0).
pub(crate) fn blend_two_thirds(mode: Bc1ApproxMode, depth: ChannelDepth, q0: u8, q1: u8) -> u8 {
    let e0 = depth.expand(q0) as i32;
    let e1 = depth.expand(q1) as i32;

    let value = match mode {
        Bc1ApproxMode::Ideal => (2 * e0 + e1) / 3,
        Bc1ApproxMode::IdealRound4 => (2 * e0 + e1 + 1) / 3,
        Bc1ApproxMode::Amd => (e0 * 43 + e1 * 21 + 32) >> 6,
        Bc1ApproxMode::Nvidia => match depth {
            ChannelDepth::Five => ((2 * q0 as i32 + q1 as i32) * 22) / 8,
            ChannelDepth::Six => {
                let diff = e1 - e0;
                (256 * e0 + diff / 4 + 128 + diff * 80) / 256
            }
        },
    };

    value.clamp(0, 255) as u8
}

/// Channel value of the midpoint entry of a 3-color table.
pub(crate) fn blend_half(mode: Bc1ApproxMode, depth: ChannelDepth, q0: u8, q1: u8) -> u8 {
    let e0 = depth.expand(q0) as i32;
    let e1 = depth.expand(q1) as i32;

    let value = match mode {
        Bc1ApproxMode::Ideal => (e0 + e1) / 2,
        Bc1ApproxMode::IdealRound4 | Bc1ApproxMode::Amd => (e0 + e1 + 1) >> 1,
        Bc1ApproxMode::Nvidia => match depth {
            ChannelDepth::Five => ((q0 as i32 + q1 as i32) * 33) / 8,
            ChannelDepth::Six => {
                let diff = e1 - e0;
                (256 * e0 + diff / 4 + 128 + diff * 128) / 256
            }
        },
    };

    value.clamp(0, 255) as u8
}

/// The decoded colors of a BC1 block.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Bc1Palette {
    pub(crate) colors: [[u8; 3]; 4],
    /// Number of leading opaque entries an encoder may choose from.
    pub(crate) opaque: usize,
    /// Whether index 3 decodes to transparent black.
    pub(crate) transparent: bool,
}

impl Bc1Palette {
    /// Builds the table a standard decoder derives from the two stored endpoints.
    ///
    /// `four_color_only` is set for the color block of BC3, which ignores the endpoint order.
    pub(crate) fn new(
        mode: Bc1ApproxMode,
        color0: Color565,
        color1: Color565,
        four_color_only: bool,
    ) -> Self {
        let q0 = color0.channels();
        let q1 = color1.channels();
        let mut colors = [color0.to_rgb(), color1.to_rgb(), [0; 3], [0; 3]];

        if four_color_only || color0 > color1 {
            for (channel, depth) in ChannelDepth::RGB.into_iter().enumerate() {
                colors[2][channel] = blend_two_thirds(mode, depth, q0[channel], q1[channel]);
                colors[3][channel] = blend_two_thirds(mode, depth, q1[channel], q0[channel]);
            }
            Self {
                colors,
                opaque: 4,
                transparent: false,
            }
        } else {
            for (channel, depth) in ChannelDepth::RGB.into_iter().enumerate() {
                colors[2][channel] = blend_half(mode, depth, q0[channel], q1[channel]);
            }
            Self {
                colors,
                opaque: 3,
                transparent: true,
            }
        }
    }

    /// Table of a 4-color block whose two endpoints are equal. Only index 0 is used, which
    /// decodes to the same color in every mode and format.
    pub(crate) fn solid(color: Color565) -> Self {
        Self {
            colors: [color.to_rgb(); 4],
            opaque: 1,
            transparent: false,
        }
    }

    /// RGBA value of the entry at `index`, as a decoder outputs it.
    pub(crate) fn rgba(&self, index: u8) -> [u8; 4] {
        if self.transparent && index == TRANSPARENT_INDEX {
            [0, 0, 0, 0]
        } else {
            let [r, g, b] = self.colors[index as usize];
            [r, g, b, 255]
        }
    }
}

/// Builds the 8 entry gradient a standard decoder derives from two BC4 endpoints.
pub(crate) fn bc4_palette(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let a0 = alpha0 as u16;
    let a1 = alpha1 as u16;

    if alpha0 > alpha1 {
        [
            alpha0,
            alpha1,
            ((6 * a0 + a1) / 7) as u8,
            ((5 * a0 + 2 * a1) / 7) as u8,
            ((4 * a0 + 3 * a1) / 7) as u8,
            ((3 * a0 + 4 * a1) / 7) as u8,
            ((2 * a0 + 5 * a1) / 7) as u8,
            ((a0 + 6 * a1) / 7) as u8,
        ]
    } else {
        [
            alpha0,
            alpha1,
            ((4 * a0 + a1) / 5) as u8,
            ((3 * a0 + 2 * a1) / 5) as u8,
            ((2 * a0 + 3 * a1) / 5) as u8,
            ((a0 + 4 * a1) / 5) as u8,
            0,
            255,
        ]
    }
}
