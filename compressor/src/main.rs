//! Compresses an image file into a DDS texture on the CPU.

use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use block_encoder::{
    encode::compress_rgba8, Bc1ApproxMode, BlockEncoder, CompressionSettings, CompressionVariant,
    MAX_LEVEL,
};
use clap::Parser;
use ddsfile::{AlphaMode, D3D10ResourceDimension, Dds, DxgiFormat, NewDxgiParams};
use image::{ImageReader, RgbaImage};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "compressor")]
#[command(about = "Compress an image into a BC1, BC3, BC4 or BC5 DDS texture", long_about = None)]
struct Args {
    /// Input image (png, bmp or tga)
    input: PathBuf,

    /// Output file path (defaults to the input path with a .dds extension)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Block compression variant: bc1, bc3, bc4 or bc5
    #[arg(long, default_value = "bc1")]
    variant: CompressionVariant,

    /// Quality level from 0 (fastest) to 18 (best)
    #[arg(long, default_value_t = 10)]
    level: u32,

    /// BC1 interpolation of the targeted decoder: ideal, nvidia, amd or ideal_round4
    #[arg(long, default_value = "ideal")]
    mode: Bc1ApproxMode,

    /// Allow the BC1 3-color mode
    #[arg(long)]
    allow_3color: bool,

    /// Encode black BC1 pixels as transparent (needs --allow-3color)
    #[arg(long)]
    black_is_transparent: bool,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();

    let level = clamp_level(args.level);

    let start = Instant::now();

    let image = ImageReader::open(&args.input)
        .with_context(|| format!("can't open input image {}", args.input.display()))?
        .decode()
        .with_context(|| format!("can't decode image {}", args.input.display()))?
        .to_rgba8();
    let width = image.width();
    let height = image.height();
    let padded = pad_to_blocks(&image);

    info!(
        width,
        height,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "image read"
    );

    let start = Instant::now();

    let encoder = BlockEncoder::new(args.mode);
    let settings = CompressionSettings {
        level,
        allow_3color: args.allow_3color,
        black_is_transparent: args.black_is_transparent,
    };

    let mut block_data = vec![0u8; args.variant.blocks_byte_size(width, height)];
    compress_rgba8(
        &encoder,
        args.variant,
        &settings,
        padded.as_raw(),
        &mut block_data,
        padded.width(),
        padded.height(),
        padded.width() * 4,
    );

    info!(
        variant = %args.variant,
        level,
        mode = %args.mode,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "compression done"
    );

    let start = Instant::now();

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("dds"));
    write_dds_file(&output, args.variant, width, height, block_data)?;

    info!(
        output = %output.display(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "DDS written"
    );

    Ok(())
}

/// Levels above [`MAX_LEVEL`] behave like [`MAX_LEVEL`].
fn clamp_level(level: u32) -> u32 {
    if level > MAX_LEVEL {
        warn!(level, max = MAX_LEVEL, "level out of range, using the highest level");
        MAX_LEVEL
    } else {
        level
    }
}

/// Extends the image to a multiple of 4 in both directions by repeating the last row and column.
fn pad_to_blocks(image: &RgbaImage) -> RgbaImage {
    let width = image.width().div_ceil(4) * 4;
    let height = image.height().div_ceil(4) * 4;

    if width == image.width() && height == image.height() {
        return image.clone();
    }

    RgbaImage::from_fn(width, height, |x, y| {
        *image.get_pixel(x.min(image.width() - 1), y.min(image.height() - 1))
    })
}

fn write_dds_file(
    path: &Path,
    variant: CompressionVariant,
    width: u32,
    height: u32,
    block_data: Vec<u8>,
) -> Result<()> {
    let mut dds = Dds::new_dxgi(NewDxgiParams {
        height,
        width,
        depth: None,
        format: dxgi_format(variant),
        mipmap_levels: Some(1),
        array_layers: None,
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Straight,
    })
    .context("failed to create DDS header")?;

    dds.data = block_data;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    dds.write(&mut file).context("failed to write DDS file")?;

    Ok(())
}

fn dxgi_format(variant: CompressionVariant) -> DxgiFormat {
    match variant {
        CompressionVariant::BC1 => DxgiFormat::BC1_UNorm_sRGB,
        CompressionVariant::BC3 => DxgiFormat::BC3_UNorm_sRGB,
        CompressionVariant::BC4 => DxgiFormat::BC4_UNorm,
        CompressionVariant::BC5 => DxgiFormat::BC5_UNorm,
    }
}
