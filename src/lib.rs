//! # block_encoder
//!
//! CPU encoder for the BC1, BC3, BC4 and BC5 block compression formats.
//!
//! Every 4x4 pixel block is encoded independently by searching for the endpoint pair and indices
//! that minimize the squared reconstruction error. The search effort is selected with a quality
//! level from `0` (fastest) to [`MAX_LEVEL`] (best). Raising the level never makes the result
//! worse.
//!
//! ## Supported block compressions
//!
//!  * BC1 (RGB, optional 1-bit transparency)
//!  * BC3 (RGBA)
//!  * BC4 (R)
//!  * BC5 (RG)
//!
//! The interpolated BC1 colors differ slightly between GPU vendors. The [`Bc1ApproxMode`] given
//! to an encoder selects which decoder its error estimates are exact for.
//!
//! ## Example
//! ```
//! use block_encoder::{encode::BlockEncoder, Bc1ApproxMode};
//!
//! let encoder = BlockEncoder::new(Bc1ApproxMode::Ideal);
//!
//! let mut pixels = [0u8; 64];
//! for (i, pixel) in pixels.chunks_exact_mut(4).enumerate() {
//!     pixel.copy_from_slice(&[i as u8 * 16, 128, 255 - i as u8 * 16, 255]);
//! }
//!
//! let mut block = [0u8; 8];
//! encoder.encode_bc1(10, &mut block, &pixels, false, false);
//! ```
mod color;
pub mod decode;
pub mod encode;
mod error;
mod pack;
mod palette;
mod settings;

use std::{fmt, str::FromStr};

pub use encode::{encode_bc1, encode_bc3, encode_bc4, encode_bc5, init, BlockEncoder};
pub use error::ParseError;
pub use settings::{Bc1ApproxMode, CompressionSettings, ErrorWeights, LevelSettings, MAX_LEVEL};

/// Compression variants supported by this crate.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum CompressionVariant {
    /// BC1 compression (RGB)
    BC1,
    /// BC3 compression with smooth alpha (RGBA)
    BC3,
    /// BC4 compression (R)
    BC4,
    /// BC5 compression (RG)
    BC5,
}

impl CompressionVariant {
    /// All supported variants.
    pub const ALL: [CompressionVariant; 4] = [
        CompressionVariant::BC1,
        CompressionVariant::BC3,
        CompressionVariant::BC4,
        CompressionVariant::BC5,
    ];

    /// Returns the bytes per row for the given width.
    ///
    /// The width is used to calculate how many blocks are needed per row,
    /// which is then multiplied by the block size.
    /// Width is rounded up to the nearest multiple of 4.
    pub const fn bytes_per_row(self, width: u32) -> u32 {
        let blocks_per_row = (width + 3) / 4;
        blocks_per_row * self.block_byte_size()
    }

    /// Returns the byte size required for storing compressed blocks for the given dimensions.
    ///
    /// The size is calculated based on the block compression format and rounded up dimensions.
    /// Width and height are rounded up to the nearest multiple of 4.
    pub const fn blocks_byte_size(self, width: u32, height: u32) -> usize {
        let block_width = (width as usize + 3) / 4;
        let block_height = (height as usize + 3) / 4;
        let block_count = block_width * block_height;
        let block_size = self.block_byte_size() as usize;
        block_count * block_size
    }

    /// Size of one encoded 4x4 block.
    pub const fn block_byte_size(self) -> u32 {
        match self {
            CompressionVariant::BC1 | CompressionVariant::BC4 => 8,
            CompressionVariant::BC3 | CompressionVariant::BC5 => 16,
        }
    }

    /// The name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            CompressionVariant::BC1 => "bc1",
            CompressionVariant::BC3 => "bc3",
            CompressionVariant::BC4 => "bc4",
            CompressionVariant::BC5 => "bc5",
        }
    }
}

impl fmt::Display for CompressionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionVariant {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompressionVariant::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownVariant(s.to_string()))
    }
}
