//! Shared test utilities for the image-label test suite.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let settings = settings_with(|s| s.anchor = Anchor::BR);
//! let tmp = TempDir::new().unwrap();
//! write_color_png(&tmp.path().join("a.png"), 320, 240);
//! ```

use crate::types::{Anchor, FontColor, JpegQuality, LabelSettings, OutputFormat};
use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Environment variable pointing at a TrueType font for font-dependent tests.
pub const TEST_FONT_ENV: &str = "IMAGE_LABEL_TEST_FONT";

/// Common install locations of a TrueType font, tried in order.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Locate a TrueType font, or `None` so the calling test can skip.
pub fn system_font() -> Option<PathBuf> {
    std::env::var_os(TEST_FONT_ENV)
        .map(PathBuf::from)
        .into_iter()
        .chain(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from))
        .find(|p| p.is_file())
}

/// Settings used across tests: TL anchor, 50px offsets, size 100, red, PNG.
pub fn test_settings() -> LabelSettings {
    LabelSettings {
        text: "Sample".to_string(),
        font_file: PathBuf::from("unused.ttf"),
        font_size: 100,
        anchor: Anchor::TL,
        offset_lr: 50,
        offset_tb: 50,
        rotate: None,
        font_color: FontColor::Red,
        black_for_bw: false,
        output_format: OutputFormat::Png,
        jpeg_quality: JpegQuality::default(),
    }
}

/// [`test_settings`] with adjustments applied.
pub fn settings_with(adjust: impl FnOnce(&mut LabelSettings)) -> LabelSettings {
    let mut settings = test_settings();
    adjust(&mut settings);
    settings
}

/// Write a PNG whose left half is red and right half blue.
pub fn write_color_png(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([220, 30, 30])
        } else {
            Rgb([30, 30, 220])
        }
    })
    .save(path)
    .unwrap();
}

/// Write a single-channel PNG with a horizontal gradient.
pub fn write_gray_png(path: &Path, width: u32, height: u32) {
    GrayImage::from_fn(width, height, |x, _| {
        Luma([(x * 255 / width.max(1)) as u8])
    })
    .save(path)
    .unwrap();
}
