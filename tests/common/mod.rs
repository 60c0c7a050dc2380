#![allow(dead_code)]

pub mod metrics;

use block_encoder::{
    decode::{decode_block_bc1, decode_block_bc3, decode_block_bc4},
    Bc1ApproxMode,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const SEED: u64 = 0x5EED_B10C;

/// Generates `count` RGBA blocks of mixed content: noise, two-tone blocks, noisy gradients and
/// blocks with a few black pixels.
pub fn random_blocks(seed: u64, count: usize) -> Vec<[u8; 64]> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|index| match index % 4 {
            0 => noise_block(&mut rng),
            1 => two_tone_block(&mut rng),
            2 => gradient_block(&mut rng),
            _ => {
                let mut block = gradient_block(&mut rng);
                for _ in 0..rng.gen_range(1..6) {
                    let pixel = rng.gen_range(0..16);
                    block[pixel * 4..pixel * 4 + 3].copy_from_slice(&[0, 0, 0]);
                }
                block
            }
        })
        .collect()
}

fn noise_block(rng: &mut StdRng) -> [u8; 64] {
    let mut block = [0u8; 64];
    rng.fill(&mut block[..]);
    block
}

fn two_tone_block(rng: &mut StdRng) -> [u8; 64] {
    let a: [u8; 4] = rng.gen();
    let b: [u8; 4] = rng.gen();

    let mut block = [0u8; 64];
    for pixel in block.chunks_exact_mut(4) {
        pixel.copy_from_slice(if rng.gen_bool(0.5) { &a } else { &b });
    }
    block
}

fn gradient_block(rng: &mut StdRng) -> [u8; 64] {
    let a: [u8; 4] = rng.gen();
    let b: [u8; 4] = rng.gen();

    let mut block = [0u8; 64];
    for (i, pixel) in block.chunks_exact_mut(4).enumerate() {
        let t = i as f32 / 15.0;
        for channel in 0..4 {
            let value = a[channel] as f32 * (1.0 - t) + b[channel] as f32 * t;
            let noise = rng.gen_range(-8.0..=8.0);
            pixel[channel] = (value + noise).clamp(0.0, 255.0) as u8;
        }
    }
    block
}

/// A smooth 64x64 RGBA test image with a soft alpha ramp.
pub fn gradient_image() -> Vec<u8> {
    let mut data = Vec::with_capacity(64 * 64 * 4);
    for y in 0..64u32 {
        for x in 0..64u32 {
            data.push((x * 255 / 63) as u8);
            data.push((y * 255 / 63) as u8);
            data.push(((x + y) * 2) as u8);
            data.push((255 - x * 3) as u8);
        }
    }
    data
}

/// A noisy RGBA test image, reproducible from `seed`.
pub fn noise_image(seed: u64, width: u32, height: u32) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; (width * height * 4) as usize];
    rng.fill(&mut data[..]);
    data
}

pub fn decode_bc1(mode: Bc1ApproxMode, block: &[u8; 8]) -> [u8; 64] {
    let mut decoded = [0u8; 64];
    decode_block_bc1(mode, block, &mut decoded, 16);
    decoded
}

pub fn decode_bc3(mode: Bc1ApproxMode, block: &[u8; 16]) -> [u8; 64] {
    let mut decoded = [0u8; 64];
    decode_block_bc3(mode, block, &mut decoded, 16);
    decoded
}

/// Decodes a BC4 block into its 16 values.
pub fn decode_bc4(block: &[u8]) -> [u8; 16] {
    let mut decoded = [0u8; 64];
    decode_block_bc4(block, &mut decoded, 16);
    std::array::from_fn(|i| decoded[i * 4])
}

/// Squared RGB error of the pixels not masked out by `skip`.
pub fn rgb_error(original: &[u8; 64], decoded: &[u8; 64], skip: impl Fn(usize) -> bool) -> u64 {
    original
        .chunks_exact(4)
        .zip(decoded.chunks_exact(4))
        .enumerate()
        .filter(|(pixel, _)| !skip(*pixel))
        .map(|(_, (a, b))| {
            (0..3)
                .map(|channel| (a[channel] as i64 - b[channel] as i64).pow(2) as u64)
                .sum::<u64>()
        })
        .sum()
}

pub fn scalar_error(original: &[u8; 16], decoded: &[u8; 16]) -> u64 {
    original
        .iter()
        .zip(decoded.iter())
        .map(|(&a, &b)| (a as i64 - b as i64).pow(2) as u64)
        .sum()
}

/// Whether a pixel counts as black for BC1 transparency.
pub fn is_black(block: &[u8; 64], pixel: usize) -> bool {
    block[pixel * 4..pixel * 4 + 3].iter().all(|&value| value < 4)
}

fn expand(value: u8, bits: u32) -> u8 {
    match bits {
        5 => (value << 3) | (value >> 2),
        _ => (value << 2) | (value >> 4),
    }
}

/// Squared error of one channel against the worst of its nearest endpoint grid points.
fn naive_channel_error(values: impl Iterator<Item = u8> + Clone, bits: u32) -> u64 {
    let count = values.clone().count() as u32;
    let mean = ((values.clone().map(u32::from).sum::<u32>() as f32) / count as f32).round() as i32;

    let grid: Vec<i32> = (0..1u8 << bits).map(|q| expand(q, bits) as i32).collect();
    let nearest = grid.iter().map(|&e| (e - mean).abs()).min().unwrap_or(0);

    grid.iter()
        .filter(|&&e| (e - mean).abs() == nearest)
        .map(|&e| {
            values
                .clone()
                .map(|value| (value as i64 - e as i64).pow(2) as u64)
                .sum::<u64>()
        })
        .max()
        .unwrap_or(0)
}

/// Error of encoding every pixel of the block with the quantized block average.
pub fn naive_bc1_error(block: &[u8; 64]) -> u64 {
    [(0, 5), (1, 6), (2, 5)]
        .into_iter()
        .map(|(channel, bits)| {
            naive_channel_error(block.chunks_exact(4).map(move |pixel| pixel[channel]), bits)
        })
        .sum()
}

/// Error of encoding every value with the rounded average.
pub fn naive_scalar_error(values: &[u8; 16]) -> u64 {
    let mean = (values.iter().map(|&value| value as u32).sum::<u32>() as f32 / 16.0).round() as i64;
    values
        .iter()
        .map(|&value| (value as i64 - mean).pow(2) as u64)
        .sum()
}
