//! TrueType font loading and the production [`TextRenderer`].
//!
//! Fonts are validated once, before any image is opened: the file must start
//! with a TrueType signature and parse as a font. Measurement and drawing use
//! `imageproc::drawing::{text_size, draw_text_mut}`, with the label size used
//! directly as the `ab_glyph` pixel scale.

use super::canvas::{Canvas, CanvasError, DrawColor};
use super::renderer::TextRenderer;
use ab_glyph::{FontVec, PxScale};
use imageproc::drawing::text_size;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Leading bytes accepted as TrueType: the version 1.0 tag and Apple's `true`.
const TRUETYPE_SIGNATURES: [[u8; 4]; 2] = [[0x00, 0x01, 0x00, 0x00], *b"true"];

#[derive(Error, Debug)]
pub enum FontError {
    #[error("cannot read font file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0} does not appear to be a TrueType font file")]
    NotTrueType(PathBuf),
    #[error("{path} could not be parsed as a font: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// A loaded TrueType font.
pub struct LabelFont {
    font: FontVec,
    path: PathBuf,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont").field("path", &self.path).finish()
    }
}

/// Whether `bytes` begin with a TrueType signature.
pub fn has_truetype_signature(bytes: &[u8]) -> bool {
    bytes
        .get(..4)
        .is_some_and(|head| TRUETYPE_SIGNATURES.iter().any(|sig| head == sig))
}

impl LabelFont {
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes, path)
    }

    /// Build from in-memory bytes; `path` is only used in messages.
    pub fn from_bytes(bytes: Vec<u8>, path: &Path) -> Result<Self, FontError> {
        if !has_truetype_signature(&bytes) {
            return Err(FontError::NotTrueType(path.to_path_buf()));
        }
        let font = FontVec::try_from_vec(bytes).map_err(|e| FontError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::debug!("loaded font {}", path.display());
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn scale(size: u32) -> PxScale {
    PxScale::from(size as f32)
}

impl TextRenderer for LabelFont {
    fn measure(&self, text: &str, size: u32) -> (u32, u32) {
        text_size(scale(size), &self.font, text)
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        x: i32,
        y: i32,
        size: u32,
        text: &str,
        color: DrawColor,
    ) -> Result<(), CanvasError> {
        canvas.draw_text(color, x, y, scale(size), &self.font, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::system_font;
    use image::RgbImage;
    use tempfile::TempDir;

    #[test]
    fn signature_check() {
        assert!(has_truetype_signature(&[0, 1, 0, 0, 9, 9]));
        assert!(has_truetype_signature(b"true...."));
        assert!(!has_truetype_signature(b"OTTO...."));
        assert!(!has_truetype_signature(&[0, 1]));
        assert!(!has_truetype_signature(b"<html>"));
    }

    #[test]
    fn missing_font_is_io_error() {
        let err = LabelFont::load(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/font.ttf"));
    }

    #[test]
    fn non_font_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.ttf");
        std::fs::write(&path, "definitely not a font").unwrap();
        assert!(matches!(
            LabelFont::load(&path),
            Err(FontError::NotTrueType(_))
        ));
    }

    #[test]
    fn truncated_font_is_invalid() {
        let bytes = vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(
            LabelFont::from_bytes(bytes, Path::new("broken.ttf")),
            Err(FontError::Invalid { .. })
        ));
    }

    #[test]
    fn measurement_shrinks_with_size() {
        let Some(path) = system_font() else {
            eprintln!("no system TrueType font found, skipping");
            return;
        };
        let font = LabelFont::load(&path).unwrap();
        let (w_big, h_big) = font.measure("Sample Label", 80);
        let (w_small, h_small) = font.measure("Sample Label", 40);
        assert!(w_big > w_small && h_big > h_small);
        assert!(w_small > 0 && h_small > 0);
    }

    #[test]
    fn draw_changes_pixels_near_origin() {
        let Some(path) = system_font() else {
            eprintln!("no system TrueType font found, skipping");
            return;
        };
        let font = LabelFont::load(&path).unwrap();
        let mut canvas = Canvas::Rgb(RgbImage::new(200, 100));
        font.draw(&mut canvas, 10, 10, 40, "Hi", DrawColor::Rgb([255, 0, 0]))
            .unwrap();
        let Canvas::Rgb(img) = canvas else {
            panic!("layout changed");
        };
        let red = img.pixels().filter(|p| p.0[0] > 128).count();
        assert!(red > 0);
        // Nothing drawn left of or above the origin
        assert!((0..100).all(|y| img.get_pixel(5, y).0 == [0, 0, 0]));
    }
}
