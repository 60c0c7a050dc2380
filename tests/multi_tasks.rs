use block_encoder::{
    encode::compress_rgba8, Bc1ApproxMode, BlockEncoder, CompressionSettings, CompressionVariant,
};

use crate::common::{noise_image, random_blocks, SEED};

mod common;

const WIDTH: u32 = 32;
const HEIGHT: u32 = 24;

fn load_block(data: &[u8], stride: usize, bx: usize, by: usize) -> [u8; 64] {
    let mut block = [0u8; 64];
    for (y, row) in block.chunks_exact_mut(16).enumerate() {
        let offset = (by * 4 + y) * stride + bx * 16;
        row.copy_from_slice(&data[offset..offset + 16]);
    }
    block
}

/// Encodes the image one block at a time, in order.
fn encode_sequentially(
    encoder: &BlockEncoder,
    variant: CompressionVariant,
    settings: &CompressionSettings,
    data: &[u8],
) -> Vec<u8> {
    let stride = WIDTH as usize * 4;
    let block_size = variant.block_byte_size() as usize;
    let mut blocks = vec![0u8; variant.blocks_byte_size(WIDTH, HEIGHT)];

    for (index, dst) in blocks.chunks_exact_mut(block_size).enumerate() {
        let bx = index % (WIDTH as usize / 4);
        let by = index / (WIDTH as usize / 4);
        let src = load_block(data, stride, bx, by);

        match variant {
            CompressionVariant::BC1 => encoder.encode_bc1(
                settings.level,
                dst.try_into().unwrap(),
                &src,
                settings.allow_3color,
                settings.black_is_transparent,
            ),
            CompressionVariant::BC3 => {
                encoder.encode_bc3(settings.level, dst.try_into().unwrap(), &src)
            }
            CompressionVariant::BC4 => encoder.encode_bc4(dst.try_into().unwrap(), &src, 4),
            CompressionVariant::BC5 => {
                encoder.encode_bc5(dst.try_into().unwrap(), &src, 0, 1, 4)
            }
        }
    }

    blocks
}

fn test_image_matches_block_encoding(variant: CompressionVariant) {
    let encoder = BlockEncoder::new(Bc1ApproxMode::Amd);
    let settings = CompressionSettings {
        level: 6,
        allow_3color: true,
        black_is_transparent: true,
    };
    let data = noise_image(SEED, WIDTH, HEIGHT);

    let mut blocks = vec![0u8; variant.blocks_byte_size(WIDTH, HEIGHT)];
    compress_rgba8(
        &encoder,
        variant,
        &settings,
        &data,
        &mut blocks,
        WIDTH,
        HEIGHT,
        WIDTH * 4,
    );

    assert_eq!(blocks, encode_sequentially(&encoder, variant, &settings, &data));
}

#[test]
fn image_matches_block_encoding_bc1() {
    test_image_matches_block_encoding(CompressionVariant::BC1);
}

#[test]
fn image_matches_block_encoding_bc3() {
    test_image_matches_block_encoding(CompressionVariant::BC3);
}

#[test]
fn image_matches_block_encoding_bc4() {
    test_image_matches_block_encoding(CompressionVariant::BC4);
}

#[test]
fn image_matches_block_encoding_bc5() {
    test_image_matches_block_encoding(CompressionVariant::BC5);
}

#[test]
fn padded_rows_are_skipped() {
    let encoder = BlockEncoder::new(Bc1ApproxMode::Ideal);
    let settings = CompressionSettings::default();
    let data = noise_image(SEED + 1, WIDTH, HEIGHT);

    // The same pixels with 12 garbage bytes at the end of every row.
    let stride = WIDTH as usize * 4 + 12;
    let mut padded = vec![0xAB; stride * HEIGHT as usize];
    for (row, source) in padded
        .chunks_exact_mut(stride)
        .zip(data.chunks_exact(WIDTH as usize * 4))
    {
        row[..source.len()].copy_from_slice(source);
    }

    for variant in CompressionVariant::ALL {
        let mut tight = vec![0u8; variant.blocks_byte_size(WIDTH, HEIGHT)];
        compress_rgba8(
            &encoder,
            variant,
            &settings,
            &data,
            &mut tight,
            WIDTH,
            HEIGHT,
            WIDTH * 4,
        );

        let mut strided = vec![0u8; variant.blocks_byte_size(WIDTH, HEIGHT)];
        compress_rgba8(
            &encoder,
            variant,
            &settings,
            &padded,
            &mut strided,
            WIDTH,
            HEIGHT,
            stride as u32,
        );

        assert_eq!(tight, strided, "{variant}");
    }
}

#[test]
fn threads_share_one_encoder() {
    let encoder = BlockEncoder::new(Bc1ApproxMode::Nvidia);
    let blocks = random_blocks(SEED + 2, 64);

    let encode_all = |level: u32| -> Vec<[u8; 16]> {
        blocks
            .iter()
            .map(|block| {
                let mut encoded = [0u8; 16];
                encoder.encode_bc3(level, &mut encoded, block);
                encoded
            })
            .collect()
    };

    let expected: Vec<_> = (0..4).map(|task| encode_all(task * 5)).collect();

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|task| scope.spawn(move || encode_all(task * 5)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(results, expected);
}

#[test]
#[should_panic(expected = "too small")]
fn undersized_output_panics() {
    let encoder = BlockEncoder::new(Bc1ApproxMode::Ideal);
    let data = noise_image(SEED, WIDTH, HEIGHT);
    let mut blocks = vec![0u8; 8];

    compress_rgba8(
        &encoder,
        CompressionVariant::BC1,
        &CompressionSettings::default(),
        &data,
        &mut blocks,
        WIDTH,
        HEIGHT,
        WIDTH * 4,
    );
}
