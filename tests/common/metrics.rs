#[derive(Debug, Clone)]
pub struct PsnrResult {
    pub overall_psnr: f64,
    pub overall_mse: f64,
    pub channel_results: ChannelResults,
}

#[derive(Debug, Clone)]
pub struct ChannelResults {
    pub red: ChannelMetrics,
    pub green: ChannelMetrics,
    pub blue: ChannelMetrics,
    pub alpha: ChannelMetrics,
}

#[derive(Debug, Clone)]
pub struct ChannelMetrics {
    pub psnr: f64,
    pub mse: f64,
}

/// Calculates quality metrics of 8-bit values against a peak of 255. The input data and output
/// data must be RGBA data. Only the first `channels` channels count towards the overall values.
pub fn calculate_image_metrics(
    original: &[u8],
    decoded: &[u8],
    width: u32,
    height: u32,
    channels: usize,
) -> PsnrResult {
    assert_eq!(
        original.len(),
        decoded.len(),
        "image buffers must have same length"
    );
    assert_eq!(
        original.len(),
        (width * height * 4) as usize,
        "buffer size doesn't match dimensions"
    );

    let mut channel_mse = [0.0f64; 4];
    let pixel_count = (width * height) as f64;

    for (a, b) in original.chunks_exact(4).zip(decoded.chunks_exact(4)) {
        for channel in 0..4 {
            let diff = a[channel] as f64 - b[channel] as f64;
            channel_mse[channel] += diff * diff;
        }
    }

    channel_mse.iter_mut().for_each(|mse| *mse /= pixel_count);

    let overall_mse = channel_mse[..channels].iter().sum::<f64>() / channels as f64;

    let metrics = |mse: f64| ChannelMetrics {
        mse,
        psnr: psnr(mse),
    };

    PsnrResult {
        overall_psnr: psnr(overall_mse),
        overall_mse,
        channel_results: ChannelResults {
            red: metrics(channel_mse[0]),
            green: metrics(channel_mse[1]),
            blue: metrics(channel_mse[2]),
            alpha: metrics(channel_mse[3]),
        },
    }
}

/// Lossless results have an infinite PSNR.
fn psnr(mse: f64) -> f64 {
    if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (255.0 * 255.0 / mse).log10()
    }
}
