//! Helpers shared by the integration tests.

#![allow(dead_code)]

use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Locate a TrueType font; tests that need one skip when this is `None`.
///
/// `IMAGE_LABEL_TEST_FONT` wins over the usual install locations.
pub fn system_font() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    std::env::var_os("IMAGE_LABEL_TEST_FONT")
        .map(PathBuf::from)
        .into_iter()
        .chain(CANDIDATES.iter().map(PathBuf::from))
        .find(|p| p.is_file())
}

/// Left half red, right half blue: clearly not black and white.
pub fn color_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([220, 30, 30])
        } else {
            Rgb([30, 30, 220])
        }
    })
}

pub fn write_color_png(path: &Path, width: u32, height: u32) {
    color_image(width, height).save(path).unwrap();
}

pub fn write_gray_png(path: &Path, width: u32, height: u32, level: u8) {
    GrayImage::from_pixel(width, height, Luma([level]))
        .save(path)
        .unwrap();
}
