//! RGB565 quantization.

/// A color quantized to the BC1 endpoint grid: 5 bits red, 6 bits green, 5 bits blue.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Color565(pub u16);

impl Color565 {
    pub const BLACK: Self = Self(0);

    pub const fn from_channels(r5: u8, g6: u8, b5: u8) -> Self {
        Self(((r5 as u16 & 31) << 11) | ((g6 as u16 & 63) << 5) | (b5 as u16 & 31))
    }

    /// Quantizes an 8-bit color to the nearest grid point.
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self::from_channels(quantize5(rgb[0]), quantize6(rgb[1]), quantize5(rgb[2]))
    }

    /// Quantizes a floating point color, clamping it into `0..=255` first.
    pub fn from_rgb_f32(rgb: [f32; 3]) -> Self {
        Self::from_rgb(rgb.map(|value| value.clamp(0.0, 255.0).round() as u8))
    }

    /// The raw 5/6/5 bit channel values.
    pub const fn channels(self) -> [u8; 3] {
        [
            ((self.0 >> 11) & 31) as u8,
            ((self.0 >> 5) & 63) as u8,
            (self.0 & 31) as u8,
        ]
    }

    /// Expands the color back to 8 bits per channel by bit replication.
    pub const fn to_rgb(self) -> [u8; 3] {
        let [r5, g6, b5] = self.channels();
        [expand5(r5), expand6(g6), expand5(b5)]
    }

    /// Moves one channel by `delta` grid steps. Returns `None` if the result leaves the grid.
    pub(crate) fn offset(self, channel: usize, delta: i32) -> Option<Self> {
        let mut channels = self.channels();
        let max = CHANNEL_MAX[channel];
        let value = channels[channel] as i32 + delta;
        if !(0..=max).contains(&value) {
            return None;
        }
        channels[channel] = value as u8;
        Some(Self::from_channels(channels[0], channels[1], channels[2]))
    }
}

/// Largest value of each 5/6/5 channel.
pub(crate) const CHANNEL_MAX: [i32; 3] = [31, 63, 31];

#[inline(always)]
pub const fn expand5(value: u8) -> u8 {
    (value << 3) | (value >> 2)
}

#[inline(always)]
pub const fn expand6(value: u8) -> u8 {
    (value << 2) | (value >> 4)
}

#[inline(always)]
pub const fn quantize5(value: u8) -> u8 {
    let value = value as u32;
    ((value * 31 + 128 + ((value * 31) >> 8)) >> 8) as u8
}

#[inline(always)]
pub const fn quantize6(value: u8) -> u8 {
    let value = value as u32;
    ((value * 63 + 128 + ((value * 63) >> 8)) >> 8) as u8
}
