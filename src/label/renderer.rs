//! Text rendering seam.
//!
//! The [`TextRenderer`] trait is the boundary between the pure label engine
//! (fit, placement) and whatever turns glyphs into pixels. The production
//! implementation is [`LabelFont`](super::font::LabelFont), backed by
//! `ab_glyph` + `imageproc`. Tests use a recording mock so fit and placement
//! can be exercised with exact, synthetic text dimensions.

use super::canvas::{Canvas, CanvasError, DrawColor};

/// Measures and draws single-line text at an integer size.
pub trait TextRenderer: Sync {
    /// Bounding box `(width, height)` of `text` at `size`.
    ///
    /// Must not grow when `size` decreases.
    fn measure(&self, text: &str, size: u32) -> (u32, u32);

    /// Draw `text` at `size` with its layout box starting at `(x, y)`.
    fn draw(
        &self,
        canvas: &mut Canvas,
        x: i32,
        y: i32,
        size: u32,
        text: &str,
        color: DrawColor,
    ) -> Result<(), CanvasError>;
}
