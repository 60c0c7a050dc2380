//! CPU based encoding.

mod bc1;
mod bc4;
mod common;
mod endpoints;
mod indices;
mod refine;
mod single_color;

use std::sync::OnceLock;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use self::{
    bc1::{encode_color_block, ColorContext, ColorOptions},
    bc4::encode_scalar_block,
    single_color::SingleColorTables,
};
use crate::{
    Bc1ApproxMode, CompressionSettings, CompressionVariant, ErrorWeights, LevelSettings,
};

/// Encoder for single BC1, BC3, BC4 and BC5 blocks.
///
/// Holds everything that depends on the targeted decoder. Building one computes the single-color
/// lookup tables of its [`Bc1ApproxMode`], after that it is immutable and can be shared between
/// threads freely.
///
/// # Example
/// ```
/// use block_encoder::{encode::BlockEncoder, Bc1ApproxMode};
///
/// let encoder = BlockEncoder::new(Bc1ApproxMode::Ideal);
///
/// let pixels = [255u8; 64];
/// let mut block = [0u8; 8];
/// encoder.encode_bc1(10, &mut block, &pixels, false, false);
/// ```
#[derive(Clone, Debug)]
pub struct BlockEncoder {
    mode: Bc1ApproxMode,
    weights: ErrorWeights,
    tables: SingleColorTables,
}

impl BlockEncoder {
    /// Creates an encoder targeting decoders that interpolate the BC1 colors like `mode`.
    pub fn new(mode: Bc1ApproxMode) -> Self {
        tracing::debug!(%mode, "building single color tables");

        Self {
            mode,
            weights: ErrorWeights::UNIFORM,
            tables: SingleColorTables::new(mode),
        }
    }

    /// Replaces the per-channel weights of the BC1 color error.
    pub fn with_weights(mut self, weights: ErrorWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn mode(&self) -> Bc1ApproxMode {
        self.mode
    }

    pub fn weights(&self) -> ErrorWeights {
        self.weights
    }

    fn color_context(&self) -> ColorContext<'_> {
        ColorContext {
            mode: self.mode,
            weights: self.weights.as_array(),
            tables: &self.tables,
        }
    }

    /// Encodes a 4x4 block of RGBA8 pixels, given in row-major order, into a BC1 block.
    ///
    /// `level` selects the search effort, see [`LevelSettings::for_level`]. Alpha is ignored.
    /// If both `allow_3color` and `black_is_transparent` are set, pixels whose red, green and
    /// blue are all below 4 are encoded as transparent black.
    pub fn encode_bc1(
        &self,
        level: u32,
        dst: &mut [u8; 8],
        src: &[u8; 64],
        allow_3color: bool,
        black_is_transparent: bool,
    ) {
        let options = ColorOptions {
            allow_3color,
            black_is_transparent,
            four_color_only: false,
        };

        let block = encode_color_block(
            &rgb_pixels(src),
            options,
            &LevelSettings::for_level(level),
            &self.color_context(),
        );
        *dst = block.to_bytes();
    }

    /// Encodes a 4x4 block of RGBA8 pixels into a BC3 block: a BC4 alpha block followed by a
    /// 4-color BC1 block.
    pub fn encode_bc3(&self, level: u32, dst: &mut [u8; 16], src: &[u8; 64]) {
        let pixels: [[u8; 4]; 16] = *bytemuck::cast_ref(src);
        let [alpha, color] = bytemuck::cast_mut::<[u8; 16], [[u8; 8]; 2]>(dst);

        *alpha = encode_scalar_block(&pixels.map(|pixel| pixel[3])).to_bytes();

        let options = ColorOptions {
            allow_3color: false,
            black_is_transparent: false,
            four_color_only: true,
        };
        *color = encode_color_block(
            &rgb_pixels(src),
            options,
            &LevelSettings::for_level(level),
            &self.color_context(),
        )
        .to_bytes();
    }

    /// Encodes the 16 values `src[0]`, `src[stride]`, ..., `src[15 * stride]` into a BC4 block.
    ///
    /// # Panics
    /// If `stride` is zero or `src` holds fewer than `15 * stride + 1` bytes.
    pub fn encode_bc4(&self, dst: &mut [u8; 8], src: &[u8], stride: usize) {
        *dst = encode_scalar_block(&load_scalar(src, stride)).to_bytes();
    }

    /// Encodes two interleaved channels into a BC5 block. The first half is read starting at
    /// `src[chan0]`, the second half starting at `src[chan1]`, both with the given stride.
    ///
    /// # Panics
    /// If `stride` is zero or either channel reads past the end of `src`.
    pub fn encode_bc5(
        &self,
        dst: &mut [u8; 16],
        src: &[u8],
        chan0: usize,
        chan1: usize,
        stride: usize,
    ) {
        assert!(
            chan0 < src.len() && chan1 < src.len(),
            "channels {chan0} and {chan1} must lie inside the {} byte source",
            src.len()
        );

        let [first, second] = bytemuck::cast_mut::<[u8; 16], [[u8; 8]; 2]>(dst);
        *first = encode_scalar_block(&load_scalar(&src[chan0..], stride)).to_bytes();
        *second = encode_scalar_block(&load_scalar(&src[chan1..], stride)).to_bytes();
    }
}

fn rgb_pixels(src: &[u8; 64]) -> [[u8; 3]; 16] {
    let pixels: [[u8; 4]; 16] = *bytemuck::cast_ref(src);
    pixels.map(|[r, g, b, _]| [r, g, b])
}

fn load_scalar(src: &[u8], stride: usize) -> [u8; 16] {
    assert!(stride > 0, "stride must be non-zero");
    assert!(
        src.len() > 15 * stride,
        "source of {} bytes is too short for 16 values with stride {stride}",
        src.len()
    );

    core::array::from_fn(|i| src[i * stride])
}

static ENCODER: OnceLock<BlockEncoder> = OnceLock::new();

/// Initializes the process-wide encoder used by the free encoding functions.
///
/// Only the first call has an effect. A later call with a different mode keeps the first mode
/// and logs a warning.
pub fn init(mode: Bc1ApproxMode) {
    let encoder = ENCODER.get_or_init(|| {
        tracing::info!(%mode, "initializing block encoder");
        BlockEncoder::new(mode)
    });

    if encoder.mode() != mode {
        tracing::warn!(
            requested = %mode,
            active = %encoder.mode(),
            "block encoder already initialized, keeping the active approximation mode"
        );
    }
}

fn global() -> &'static BlockEncoder {
    match ENCODER.get() {
        Some(encoder) => encoder,
        None => panic!("block encoder used before `init` was called"),
    }
}

/// Encodes a BC1 block with the process-wide encoder. See [`BlockEncoder::encode_bc1`].
///
/// # Panics
/// If [`init`] was not called before.
pub fn encode_bc1(
    level: u32,
    dst: &mut [u8; 8],
    src: &[u8; 64],
    allow_3color: bool,
    black_is_transparent: bool,
) {
    global().encode_bc1(level, dst, src, allow_3color, black_is_transparent);
}

/// Encodes a BC3 block with the process-wide encoder. See [`BlockEncoder::encode_bc3`].
///
/// # Panics
/// If [`init`] was not called before.
pub fn encode_bc3(level: u32, dst: &mut [u8; 16], src: &[u8; 64]) {
    global().encode_bc3(level, dst, src);
}

/// Encodes a BC4 block with the process-wide encoder. See [`BlockEncoder::encode_bc4`].
///
/// # Panics
/// If [`init`] was not called before.
pub fn encode_bc4(dst: &mut [u8; 8], src: &[u8], stride: usize) {
    global().encode_bc4(dst, src, stride);
}

/// Encodes a BC5 block with the process-wide encoder. See [`BlockEncoder::encode_bc5`].
///
/// # Panics
/// If [`init`] was not called before.
pub fn encode_bc5(dst: &mut [u8; 16], src: &[u8], chan0: usize, chan1: usize, stride: usize) {
    global().encode_bc5(dst, src, chan0, chan1, stride);
}

/// Compresses raw RGBA8 data into BC1, BC3, BC4 or BC5 blocks.
///
/// BC4 encodes the red channel, BC5 the red and green channels. With the `rayon` feature the
/// block rows are encoded in parallel. The output does not depend on it.
///
/// # Buffer Requirements
/// The destination buffer must have sufficient capacity to store the compressed blocks.
/// The required size can be calculated using [`CompressionVariant::blocks_byte_size()`].
///
/// # Arguments
/// * `encoder` - The encoder to use
/// * `variant` - The block compression format to use
/// * `settings` - Quality level and BC1 transparency handling
/// * `rgba_data` - Source RGBA8 pixel data
/// * `blocks_buffer` - Destination buffer for the compressed blocks
/// * `width` - Width of the image in pixels
/// * `height` - Height of the image in pixels
/// * `stride` - Number of bytes per row in the source data (for padding).
///   Must be `width * 4` for tightly packed RGBA data.
///
/// # Panics
/// * If `width` or `height` is not a multiple of 4
/// * If the destination `blocks_buffer` is too small to hold the compressed data
///
/// # Example
/// ```
/// use block_encoder::{
///     encode::{compress_rgba8, BlockEncoder},
///     Bc1ApproxMode, CompressionSettings, CompressionVariant,
/// };
///
/// let encoder = BlockEncoder::new(Bc1ApproxMode::Ideal);
/// let rgba_data = vec![0u8; 64 * 64 * 4];
/// let width = 64;
/// let height = 64;
/// let variant = CompressionVariant::BC1;
///
/// let mut blocks_buffer = vec![0u8; variant.blocks_byte_size(width, height)];
///
/// compress_rgba8(
///     &encoder,
///     variant,
///     &CompressionSettings::default(),
///     &rgba_data,
///     &mut blocks_buffer,
///     width,
///     height,
///     width * 4,
/// );
/// ```
#[allow(clippy::too_many_arguments)]
pub fn compress_rgba8(
    encoder: &BlockEncoder,
    variant: CompressionVariant,
    settings: &CompressionSettings,
    rgba_data: &[u8],
    blocks_buffer: &mut [u8],
    width: u32,
    height: u32,
    stride: u32,
) {
    assert_eq!(height % 4, 0);
    assert_eq!(width % 4, 0);

    let required_size = variant.blocks_byte_size(width, height);

    assert!(
        blocks_buffer.len() >= required_size,
        "blocks_buffer size ({}) is too small to hold compressed blocks. Required size: {}",
        blocks_buffer.len(),
        required_size
    );

    tracing::debug!(%variant, width, height, level = settings.level, "compressing image");

    let image = Image {
        rgba_data,
        stride: stride as usize,
        row_bytes: variant.bytes_per_row(width) as usize,
    };
    let blocks_buffer = &mut blocks_buffer[..required_size];
    let level = settings.level;

    match variant {
        CompressionVariant::BC1 => image.encode_rows(blocks_buffer, |dst: &mut [u8; 8], src| {
            encoder.encode_bc1(
                level,
                dst,
                src,
                settings.allow_3color,
                settings.black_is_transparent,
            )
        }),
        CompressionVariant::BC3 => image.encode_rows(blocks_buffer, |dst: &mut [u8; 16], src| {
            encoder.encode_bc3(level, dst, src)
        }),
        CompressionVariant::BC4 => image.encode_rows(blocks_buffer, |dst: &mut [u8; 8], src| {
            encoder.encode_bc4(dst, src, 4)
        }),
        CompressionVariant::BC5 => image.encode_rows(blocks_buffer, |dst: &mut [u8; 16], src| {
            encoder.encode_bc5(dst, src, 0, 1, 4)
        }),
    }
}

struct Image<'a> {
    rgba_data: &'a [u8],
    stride: usize,
    row_bytes: usize,
}

impl Image<'_> {
    fn load_block(&self, xx: usize, yy: usize) -> [u8; 64] {
        let mut block = [0u8; 64];

        for (y, row) in block.chunks_exact_mut(16).enumerate() {
            let offset = (yy * 4 + y) * self.stride + xx * 16;
            row.copy_from_slice(&self.rgba_data[offset..offset + 16]);
        }

        block
    }

    fn encode_rows<const N: usize>(
        &self,
        blocks_buffer: &mut [u8],
        encode: impl Fn(&mut [u8; N], &[u8; 64]) + Sync,
    ) where
        [u8; N]: bytemuck::Pod,
    {
        let encode_row = |(yy, row): (usize, &mut [u8])| {
            let blocks: &mut [[u8; N]] = bytemuck::cast_slice_mut(row);
            for (xx, dst) in blocks.iter_mut().enumerate() {
                encode(dst, &self.load_block(xx, yy));
            }
        };

        #[cfg(feature = "rayon")]
        blocks_buffer
            .par_chunks_exact_mut(self.row_bytes)
            .enumerate()
            .for_each(encode_row);

        #[cfg(not(feature = "rayon"))]
        blocks_buffer
            .chunks_exact_mut(self.row_bytes)
            .enumerate()
            .for_each(encode_row);
    }
}
