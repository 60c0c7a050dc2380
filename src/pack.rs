//! Bit layouts of the compressed blocks.

use crate::color::Color565;

/// An unpacked BC1 block: two endpoints and 16 two-bit indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Bc1Block {
    pub(crate) color0: Color565,
    pub(crate) color1: Color565,
    pub(crate) indices: [u8; 16],
}

impl Bc1Block {
    /// Block whose 16 pixels all decode to transparent black.
    pub(crate) const TRANSPARENT: Self = Self {
        color0: Color565::BLACK,
        color1: Color565::BLACK,
        indices: [3; 16],
    };

    pub(crate) fn to_bytes(self) -> [u8; 8] {
        let bits = self
            .indices
            .iter()
            .enumerate()
            .fold(0u32, |bits, (pixel, &index)| {
                bits | ((index as u32 & 3) << (pixel * 2))
            });

        let mut bytes = [0u8; 8];
        bytes[0..2].copy_from_slice(&self.color0.0.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.color1.0.to_le_bytes());
        bytes[4..8].copy_from_slice(&bits.to_le_bytes());
        bytes
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        let color0 = Color565(u16::from_le_bytes([bytes[0], bytes[1]]));
        let color1 = Color565(u16::from_le_bytes([bytes[2], bytes[3]]));
        let bits = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        let mut indices = [0u8; 16];
        for (pixel, index) in indices.iter_mut().enumerate() {
            *index = ((bits >> (pixel * 2)) & 3) as u8;
        }

        Self {
            color0,
            color1,
            indices,
        }
    }
}

/// An unpacked BC4 block: two endpoints and 16 three-bit indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Bc4Block {
    pub(crate) alpha0: u8,
    pub(crate) alpha1: u8,
    pub(crate) indices: [u8; 16],
}

impl Bc4Block {
    pub(crate) fn to_bytes(self) -> [u8; 8] {
        let bits = self
            .indices
            .iter()
            .enumerate()
            .fold(0u64, |bits, (pixel, &index)| {
                bits | ((index as u64 & 7) << (pixel * 3))
            });

        let word = self.alpha0 as u64 | ((self.alpha1 as u64) << 8) | (bits << 16);
        word.to_le_bytes()
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[..8]);
        let word = u64::from_le_bytes(word);

        let mut indices = [0u8; 16];
        for (pixel, index) in indices.iter_mut().enumerate() {
            *index = ((word >> (16 + pixel * 3)) & 7) as u8;
        }

        Self {
            alpha0: word as u8,
            alpha1: (word >> 8) as u8,
            indices,
        }
    }
}
