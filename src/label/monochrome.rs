//! Black-and-white detection and draw color selection.
//!
//! An image counts as black-and-white when it is stored as grayscale (with or
//! without alpha), or when the per-channel variances are close together:
//! grayscale content stored as RGB has near-identical variance in every
//! channel, while color content pulls them apart. This is a heuristic, not a color-space classifier.

use super::canvas::{Canvas, DrawColor};
use crate::types::FontColor;

/// Spread between channel variances at which an image stops counting as
/// monochrome.
pub const MONOCHROME_SPREAD_THRESHOLD: f64 = 200.0;

/// Population variance of every stored channel, alpha included.
pub fn channel_variances(canvas: &Canvas) -> Vec<f64> {
    let channels = canvas.channel_count();
    let samples = canvas.samples();
    let count = (samples.len() / channels) as f64;
    if count == 0.0 {
        return vec![0.0; channels];
    }

    let mut sums = vec![0.0f64; channels];
    let mut sums_sq = vec![0.0f64; channels];
    for pixel in samples.chunks_exact(channels) {
        for (c, &v) in pixel.iter().enumerate() {
            let v = f64::from(v);
            sums[c] += v;
            sums_sq[c] += v * v;
        }
    }

    sums.iter()
        .zip(&sums_sq)
        .map(|(sum, sum_sq)| (sum_sq - sum * sum / count) / count)
        .collect()
}

/// Classify from precomputed channel variances.
pub fn is_monochrome_variances(variances: &[f64]) -> bool {
    if variances.len() <= 1 {
        return true;
    }
    let max = variances.iter().copied().fold(f64::MIN, f64::max);
    let min = variances.iter().copied().fold(f64::MAX, f64::min);
    max - min < MONOCHROME_SPREAD_THRESHOLD
}

/// Grayscale canvases (with or without alpha) can only take an intensity, so
/// they are monochrome regardless of their statistics.
pub fn is_monochrome(canvas: &Canvas) -> bool {
    if canvas.is_grayscale() {
        return true;
    }
    is_monochrome_variances(&channel_variances(canvas))
}

/// Pick the draw color: an intensity for black-and-white images, the palette
/// color otherwise.
pub fn select_draw_color(monochrome: bool, font_color: FontColor, black_for_bw: bool) -> DrawColor {
    match (monochrome, black_for_bw) {
        (true, true) => DrawColor::Intensity(0),
        (true, false) => DrawColor::Intensity(255),
        (false, _) => DrawColor::Rgb(font_color.rgb()),
    }
}
