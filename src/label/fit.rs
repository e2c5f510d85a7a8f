//! Shrink-to-fit font size resolution.
//!
//! A size fits when the measured text box, padded by the offsets on both
//! sides, is strictly smaller than the image on both axes:
//!
//! ```text
//! offset_lr * 2 + text_width  < image_width
//! offset_tb * 2 + text_height < image_height
//! ```
//!
//! The search starts at the configured size and steps down by one until a
//! size fits or the size reaches zero. Text boxes never grow as the size
//! shrinks, so the first fitting size is the largest one.

use super::renderer::TextRenderer;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    #[error(
        "label cannot fit on a {image_width}x{image_height} image with offsets \
         {offset_lr}px left/right and {offset_tb}px top/bottom at any font size"
    )]
    DoesNotFit {
        image_width: u32,
        image_height: u32,
        offset_lr: u32,
        offset_tb: u32,
    },
}

/// A font size that fits, with the text box measured at that size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FittedFont {
    pub size: u32,
    pub width: u32,
    pub height: u32,
    /// Size the search started from.
    pub start_size: u32,
}

impl FittedFont {
    /// How many sizes were rejected before this one fit.
    pub fn shrunk_by(&self) -> u32 {
        self.start_size - self.size
    }
}

/// Whether a `text_width`×`text_height` box fits inside the offset-bounded area.
pub fn fits(
    text_width: u32,
    text_height: u32,
    image_width: u32,
    image_height: u32,
    offset_lr: u32,
    offset_tb: u32,
) -> bool {
    let padded_w = u64::from(offset_lr) * 2 + u64::from(text_width);
    let padded_h = u64::from(offset_tb) * 2 + u64::from(text_height);
    padded_w < u64::from(image_width) && padded_h < u64::from(image_height)
}

/// Find the largest size `<= start_size` at which `text` fits the image.
pub fn resolve_fit(
    renderer: &(impl TextRenderer + ?Sized),
    text: &str,
    start_size: u32,
    image_width: u32,
    image_height: u32,
    offset_lr: u32,
    offset_tb: u32,
) -> Result<FittedFont, FitError> {
    for size in (1..=start_size).rev() {
        let (width, height) = renderer.measure(text, size);
        if fits(width, height, image_width, image_height, offset_lr, offset_tb) {
            log::debug!(
                "size {size} fits ({width}x{height} text on {image_width}x{image_height} image)"
            );
            return Ok(FittedFont {
                size,
                width,
                height,
                start_size,
            });
        }
        log::trace!("size {size} too large ({width}x{height})");
    }

    Err(FitError::DoesNotFit {
        image_width,
        image_height,
        offset_lr,
        offset_tb,
    })
}
