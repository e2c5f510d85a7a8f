//! The mutable raster a label is drawn on.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (BMP, JPEG, PNG) | `image::ImageReader` |
//! | Rotate by 90 / 180 / 270 | `image::imageops::rotate90` etc. (lossless) |
//! | Rotate by any other angle | `imageproc::geometric_transformations::warp_into` |
//! | Draw text | `imageproc::drawing::draw_text_mut` with an `ab_glyph` font |
//! | Encode | `image::codecs::{bmp, jpeg, png}` encoders |
//!
//! Decoded images are normalized to one of four 8-bit layouts so every later
//! step (variance statistics, drawing, encoding) can match on them exhaustively.

use crate::types::{JpegQuality, OutputFormat};
use ab_glyph::{Font, PxScale};
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, ImageReader, Luma, LumaA, Pixel, Rgb,
    RgbImage, Rgba, RgbaImage, imageops,
};
use imageproc::drawing::draw_text_mut;
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("an RGB color cannot be drawn on a grayscale image")]
    RgbOnGrayscale,
}

/// Color handed to the draw primitive.
///
/// Grayscale canvases only accept [`DrawColor::Intensity`]; RGB canvases
/// accept both and render an intensity as the matching gray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawColor {
    Intensity(u8),
    Rgb([u8; 3]),
}

/// An 8-bit raster in one of the four layouts the labeler works with.
#[derive(Debug, Clone, PartialEq)]
pub enum Canvas {
    Gray(GrayImage),
    GrayAlpha(GrayAlphaImage),
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl From<DynamicImage> for Canvas {
    fn from(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(b) => Canvas::Gray(b),
            DynamicImage::ImageLumaA8(b) => Canvas::GrayAlpha(b),
            DynamicImage::ImageRgb8(b) => Canvas::Rgb(b),
            DynamicImage::ImageRgba8(b) => Canvas::Rgba(b),
            other => match (other.color().has_color(), other.color().has_alpha()) {
                (false, false) => Canvas::Gray(other.to_luma8()),
                (false, true) => Canvas::GrayAlpha(other.to_luma_alpha8()),
                (true, false) => Canvas::Rgb(other.to_rgb8()),
                (true, true) => Canvas::Rgba(other.to_rgba8()),
            },
        }
    }
}

impl From<Canvas> for DynamicImage {
    fn from(canvas: Canvas) -> Self {
        match canvas {
            Canvas::Gray(b) => DynamicImage::ImageLuma8(b),
            Canvas::GrayAlpha(b) => DynamicImage::ImageLumaA8(b),
            Canvas::Rgb(b) => DynamicImage::ImageRgb8(b),
            Canvas::Rgba(b) => DynamicImage::ImageRgba8(b),
        }
    }
}

impl Canvas {
    /// Open and decode an image, guessing the format from its content.
    pub fn open(path: &Path) -> Result<Self, CanvasError> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(Self::from(img))
    }

    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Canvas::Gray(b) => b.dimensions(),
            Canvas::GrayAlpha(b) => b.dimensions(),
            Canvas::Rgb(b) => b.dimensions(),
            Canvas::Rgba(b) => b.dimensions(),
        }
    }

    /// Number of stored channels, alpha included.
    pub fn channel_count(&self) -> usize {
        match self {
            Canvas::Gray(_) => 1,
            Canvas::GrayAlpha(_) => 2,
            Canvas::Rgb(_) => 3,
            Canvas::Rgba(_) => 4,
        }
    }

    pub fn is_grayscale(&self) -> bool {
        matches!(self, Canvas::Gray(_) | Canvas::GrayAlpha(_))
    }

    /// Raw interleaved samples, `channel_count()` per pixel.
    pub fn samples(&self) -> &[u8] {
        match self {
            Canvas::Gray(b) => b.as_raw(),
            Canvas::GrayAlpha(b) => b.as_raw(),
            Canvas::Rgb(b) => b.as_raw(),
            Canvas::Rgba(b) => b.as_raw(),
        }
    }

    /// Rotate clockwise by `degrees`, growing the canvas so no corner is cut.
    ///
    /// Uncovered area is filled with zeros (black, or transparent black).
    pub fn rotate_clockwise(self, degrees: u16) -> Self {
        match degrees % 360 {
            0 => self,
            90 => self.quarter_turns(1),
            180 => self.quarter_turns(2),
            270 => self.quarter_turns(3),
            d => self.rotate_expanded(d),
        }
    }

    fn quarter_turns(self, turns: u8) -> Self {
        match self {
            Canvas::Gray(b) => Canvas::Gray(turn(&b, turns)),
            Canvas::GrayAlpha(b) => Canvas::GrayAlpha(turn(&b, turns)),
            Canvas::Rgb(b) => Canvas::Rgb(turn(&b, turns)),
            Canvas::Rgba(b) => Canvas::Rgba(turn(&b, turns)),
        }
    }

    fn rotate_expanded(self, degrees: u16) -> Self {
        let (w, h) = self.dimensions();
        let (out_w, out_h) = expanded_dimensions(w, h, degrees);
        let projection = rotation_projection(w, h, out_w, out_h, degrees);

        match self {
            Canvas::Gray(b) => {
                let mut out = GrayImage::new(out_w, out_h);
                warp_into(&b, &projection, Interpolation::Bilinear, Luma([0]), &mut out);
                Canvas::Gray(out)
            }
            Canvas::GrayAlpha(b) => {
                let mut out = GrayAlphaImage::new(out_w, out_h);
                warp_into(&b, &projection, Interpolation::Bilinear, LumaA([0, 0]), &mut out);
                Canvas::GrayAlpha(out)
            }
            Canvas::Rgb(b) => {
                let mut out = RgbImage::new(out_w, out_h);
                warp_into(&b, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut out);
                Canvas::Rgb(out)
            }
            Canvas::Rgba(b) => {
                let mut out = RgbaImage::new(out_w, out_h);
                warp_into(
                    &b,
                    &projection,
                    Interpolation::Bilinear,
                    Rgba([0, 0, 0, 0]),
                    &mut out,
                );
                Canvas::Rgba(out)
            }
        }
    }

    /// Check that `color` can be drawn on this canvas without conversion loss.
    pub fn accepts(&self, color: DrawColor) -> Result<(), CanvasError> {
        match (self.is_grayscale(), color) {
            (true, DrawColor::Rgb(_)) => Err(CanvasError::RgbOnGrayscale),
            _ => Ok(()),
        }
    }

    /// Draw `text` with its layout box starting at `(x, y)`.
    pub fn draw_text(
        &mut self,
        color: DrawColor,
        x: i32,
        y: i32,
        scale: PxScale,
        font: &impl Font,
        text: &str,
    ) -> Result<(), CanvasError> {
        match (self, color) {
            (Canvas::Gray(b), DrawColor::Intensity(v)) => {
                draw_text_mut(b, Luma([v]), x, y, scale, font, text)
            }
            (Canvas::GrayAlpha(b), DrawColor::Intensity(v)) => {
                draw_text_mut(b, LumaA([v, 255]), x, y, scale, font, text)
            }
            (Canvas::Rgb(b), color) => draw_text_mut(b, Rgb(color.rgb()), x, y, scale, font, text),
            (Canvas::Rgba(b), color) => {
                let [r, g, bl] = color.rgb();
                draw_text_mut(b, Rgba([r, g, bl, 255]), x, y, scale, font, text)
            }
            (Canvas::Gray(_) | Canvas::GrayAlpha(_), DrawColor::Rgb(_)) => {
                return Err(CanvasError::RgbOnGrayscale);
            }
        }
        Ok(())
    }

    /// Encode into `path` using `format`; only JPEG reads `quality`.
    ///
    /// JPEG has no alpha channel, so alpha is dropped before encoding.
    /// Nothing is written to `path` unless encoding succeeds.
    pub fn save(
        &self,
        path: &Path,
        format: OutputFormat,
        quality: JpegQuality,
    ) -> Result<(), CanvasError> {
        let bytes = self.encode(format, quality)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Encode into an in-memory file of the given format.
    pub fn encode(&self, format: OutputFormat, quality: JpegQuality) -> Result<Vec<u8>, CanvasError> {
        let mut buf = Cursor::new(Vec::new());
        match format {
            OutputFormat::Png => self.to_dynamic().write_with_encoder(PngEncoder::new(&mut buf))?,
            OutputFormat::Bmp => self
                .to_dynamic()
                .write_with_encoder(BmpEncoder::new(&mut buf))?,
            OutputFormat::Jpeg => {
                let opaque = match self {
                    Canvas::GrayAlpha(_) => DynamicImage::ImageLuma8(self.to_dynamic().to_luma8()),
                    Canvas::Rgba(_) => DynamicImage::ImageRgb8(self.to_dynamic().to_rgb8()),
                    _ => self.to_dynamic(),
                };
                opaque.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.value()))?
            }
        }
        Ok(buf.into_inner())
    }

    fn to_dynamic(&self) -> DynamicImage {
        DynamicImage::from(self.clone())
    }
}

impl DrawColor {
    fn rgb(self) -> [u8; 3] {
        match self {
            DrawColor::Intensity(v) => [v, v, v],
            DrawColor::Rgb(c) => c,
        }
    }
}

/// Lossless clockwise rotation by a whole number of quarter turns.
fn turn<P>(buf: &ImageBuffer<P, Vec<u8>>, turns: u8) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    match turns % 4 {
        1 => imageops::rotate90(buf),
        2 => imageops::rotate180(buf),
        3 => imageops::rotate270(buf),
        _ => buf.clone(),
    }
}

/// Bounding box of a `w`×`h` rectangle rotated by `degrees`.
pub(crate) fn expanded_dimensions(w: u32, h: u32, degrees: u16) -> (u32, u32) {
    let theta = f64::from(degrees).to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (f64::from(w), f64::from(h));
    // Trim float noise so exact fits do not gain a pixel
    let out_w = (w * cos + h * sin - 1e-6).ceil().max(1.0);
    let out_h = (w * sin + h * cos - 1e-6).ceil().max(1.0);
    (out_w as u32, out_h as u32)
}

/// Projection mapping source pixels onto the expanded, clockwise-rotated canvas.
///
/// Image rows grow downwards, so a positive angle is a clockwise turn.
fn rotation_projection(w: u32, h: u32, out_w: u32, out_h: u32, degrees: u16) -> Projection {
    let theta = f32::from(degrees).to_radians();
    Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-(w as f32) / 2.0, -(h as f32) / 2.0)
}
