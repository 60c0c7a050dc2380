//! CPU based decoding, the inverse of [`encode`](crate::encode).
//!
//! All decoders write RGBA8. BC4 fills red, BC5 fills red and green.

mod block;

pub use self::block::{decode_block_bc1, decode_block_bc3, decode_block_bc4, decode_block_bc5};
use crate::{Bc1ApproxMode, CompressionVariant};

trait BlockDecoder {
    const VARIANT: CompressionVariant;

    fn decode_block(
        mode: Bc1ApproxMode,
        compressed: &[u8],
        decompressed: &mut [u8],
        pitch: usize,
    );
}

struct BC1Decoder;
struct BC3Decoder;
struct BC4Decoder;
struct BC5Decoder;

impl BlockDecoder for BC1Decoder {
    const VARIANT: CompressionVariant = CompressionVariant::BC1;

    #[inline(always)]
    fn decode_block(mode: Bc1ApproxMode, compressed: &[u8], decompressed: &mut [u8], pitch: usize) {
        decode_block_bc1(mode, compressed, decompressed, pitch)
    }
}

impl BlockDecoder for BC3Decoder {
    const VARIANT: CompressionVariant = CompressionVariant::BC3;

    #[inline(always)]
    fn decode_block(mode: Bc1ApproxMode, compressed: &[u8], decompressed: &mut [u8], pitch: usize) {
        decode_block_bc3(mode, compressed, decompressed, pitch)
    }
}

impl BlockDecoder for BC4Decoder {
    const VARIANT: CompressionVariant = CompressionVariant::BC4;

    #[inline(always)]
    fn decode_block(_: Bc1ApproxMode, compressed: &[u8], decompressed: &mut [u8], pitch: usize) {
        decode_block_bc4(compressed, decompressed, pitch)
    }
}

impl BlockDecoder for BC5Decoder {
    const VARIANT: CompressionVariant = CompressionVariant::BC5;

    #[inline(always)]
    fn decode_block(_: Bc1ApproxMode, compressed: &[u8], decompressed: &mut [u8], pitch: usize) {
        decode_block_bc5(compressed, decompressed, pitch)
    }
}

fn decompress<D: BlockDecoder>(
    mode: Bc1ApproxMode,
    width: u32,
    height: u32,
    input_bitstream: &[u8],
    output_bitstream: &mut [u8],
) {
    let blocks_x = width.div_ceil(4) as usize;
    let block_byte_size = D::VARIANT.block_byte_size() as usize;
    let row_pitch = width as usize * 4;

    for (block_index, block) in input_bitstream.chunks_exact(block_byte_size).enumerate() {
        let bx = block_index % blocks_x;
        let by = block_index / blocks_x;

        // Blocks overhanging the image are decoded into a scratch buffer and cropped.
        let visible_width = (width as usize - bx * 4).min(4);
        let visible_height = (height as usize - by * 4).min(4);

        if visible_width == 4 && visible_height == 4 {
            let output_offset = by * 4 * row_pitch + bx * 16;
            D::decode_block(mode, block, &mut output_bitstream[output_offset..], row_pitch);
        } else {
            let mut scratch = [0u8; 64];
            D::decode_block(mode, block, &mut scratch, 16);

            for y in 0..visible_height {
                let output_offset = (by * 4 + y) * row_pitch + bx * 16;
                output_bitstream[output_offset..][..visible_width * 4]
                    .copy_from_slice(&scratch[y * 16..][..visible_width * 4]);
            }
        }
    }
}

/// Decompresses blocks into RGBA8 data of `width * height` pixels.
///
/// `mode` selects how the interpolated BC1 colors are computed. It is ignored for BC4 and BC5.
///
/// # Panics
/// If `input_bitstream` is not exactly `variant.blocks_byte_size(width, height)` bytes or
/// `output_bitstream` is not exactly `width * height * 4` bytes.
pub fn decompress_blocks(
    variant: CompressionVariant,
    mode: Bc1ApproxMode,
    width: u32,
    height: u32,
    input_bitstream: &[u8],
    output_bitstream: &mut [u8],
) {
    let expected_input_size = variant.blocks_byte_size(width, height);
    if input_bitstream.len() != expected_input_size {
        panic!("the input bitstream slice has not the expected size");
    }

    let expected_output_size = width as usize * height as usize * 4;
    if output_bitstream.len() != expected_output_size {
        panic!("the output slice has not the expected size");
    }

    match variant {
        CompressionVariant::BC1 => {
            decompress::<BC1Decoder>(mode, width, height, input_bitstream, output_bitstream)
        }
        CompressionVariant::BC3 => {
            decompress::<BC3Decoder>(mode, width, height, input_bitstream, output_bitstream)
        }
        CompressionVariant::BC4 => {
            decompress::<BC4Decoder>(mode, width, height, input_bitstream, output_bitstream)
        }
        CompressionVariant::BC5 => {
            decompress::<BC5Decoder>(mode, width, height, input_bitstream, output_bitstream)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_blocks_are_cropped() {
        // One red block covering a 2x3 image.
        let input = [0x00, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut output = [0u8; 2 * 3 * 4];

        decompress_blocks(
            CompressionVariant::BC1,
            Bc1ApproxMode::Ideal,
            2,
            3,
            &input,
            &mut output,
        );

        for pixel in output.chunks_exact(4) {
            assert_eq!(pixel, [0xFF, 0, 0, 0xFF]);
        }
    }

    #[test]
    #[should_panic(expected = "input bitstream")]
    fn wrong_input_size_panics() {
        let mut output = [0u8; 4 * 4 * 4];
        decompress_blocks(
            CompressionVariant::BC3,
            Bc1ApproxMode::Ideal,
            4,
            4,
            &[0; 8],
            &mut output,
        );
    }
}
