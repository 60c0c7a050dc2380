//! Block decoders, structured after "bcdec.h"
//!
//! <https://github.com/iOrange/bcdec/blob/main/bcdec.h>
//!
//! The interpolated BC1 colors are computed by the shared palette code, so decoding matches the
//! error estimates of an encoder using the same [`Bc1ApproxMode`].

use crate::{
    pack::{Bc1Block, Bc4Block},
    palette::{bc4_palette, Bc1Palette},
    Bc1ApproxMode,
};

/// Decodes a BC1 block by reading 8 bytes from `compressed_block` and writing the RGBA8 data into `decompressed_block` with `destination_pitch` many bytes per output row.
#[inline(always)]
pub fn decode_block_bc1(
    mode: Bc1ApproxMode,
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_color_block::<false>(mode, compressed_block, decompressed_block, destination_pitch);
}

/// Decodes a BC3 block by reading 16 bytes from `compressed_block` and writing the RGBA8 data into `decompressed_block` with `destination_pitch` many bytes per output row.
#[inline(always)]
pub fn decode_block_bc3(
    mode: Bc1ApproxMode,
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_color_block::<true>(
        mode,
        &compressed_block[8..],
        decompressed_block,
        destination_pitch,
    );
    decode_smooth_alpha_block(
        compressed_block,
        &mut decompressed_block[3..],
        destination_pitch,
    );
}

/// Decodes a BC4 block by reading 8 bytes from `compressed_block` and writing the RGBA8 data into `decompressed_block` with `destination_pitch` many bytes per output row.
///
/// The value lands in red, green and blue are zero and alpha is opaque.
#[inline(always)]
pub fn decode_block_bc4(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    fill_opaque_black(decompressed_block, destination_pitch);
    decode_smooth_alpha_block(compressed_block, decompressed_block, destination_pitch);
}

/// Decodes a BC5 block by reading 16 bytes from `compressed_block` and writing the RGBA8 data into `decompressed_block` with `destination_pitch` many bytes per output row.
///
/// The two values land in red and green, blue is zero and alpha is opaque.
#[inline(always)]
pub fn decode_block_bc5(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    fill_opaque_black(decompressed_block, destination_pitch);
    decode_smooth_alpha_block(compressed_block, decompressed_block, destination_pitch);
    decode_smooth_alpha_block(
        &compressed_block[8..],
        &mut decompressed_block[1..],
        destination_pitch,
    );
}

fn fill_opaque_black(decompressed_block: &mut [u8], destination_pitch: usize) {
    for i in 0..4 {
        for pixel in decompressed_block[i * destination_pitch..][..16].chunks_exact_mut(4) {
            pixel.copy_from_slice(&[0, 0, 0, 0xFF]);
        }
    }
}

/// Decompresses a BC1/DXT1 color block
#[inline(always)]
fn decode_color_block<const OPAQUE_MODE: bool>(
    mode: Bc1ApproxMode,
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    let block = Bc1Block::from_bytes(compressed_block);
    let palette = Bc1Palette::new(mode, block.color0, block.color1, OPAQUE_MODE);

    // Fill out the decompressed color block
    for i in 0..4 {
        for j in 0..4 {
            let color = palette.rgba(block.indices[i * 4 + j]);
            let offset = i * destination_pitch + j * 4;

            if OPAQUE_MODE {
                decompressed_block[offset..][..3].copy_from_slice(&color[..3]);
            } else {
                decompressed_block[offset..][..4].copy_from_slice(&color);
            }
        }
    }
}

/// Decodes a BC4 gradient block into every fourth byte.
#[inline(always)]
fn decode_smooth_alpha_block(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    let block = Bc4Block::from_bytes(compressed_block);
    let values = bc4_palette(block.alpha0, block.alpha1);

    for i in 0..4 {
        for j in 0..4 {
            decompressed_block[i * destination_pitch + j * 4] =
                values[block.indices[i * 4 + j] as usize];
        }
    }
}
