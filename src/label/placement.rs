//! Anchor-driven label placement.
//!
//! Each axis is resolved independently from the anchor's class on that axis:
//!
//! | Class | x | y |
//! |---|---|---|
//! | edge (left / top) | `offset` | `offset` |
//! | centered | `(image - text) / 2` | `(image - text) / 2` |
//! | far edge (right / bottom) | `image - (text + offset)` | `image - (text + offset)` |
//!
//! No clamping happens here; a successful fit guarantees the box stays inside
//! the offsets.

use super::fit::{FitError, FittedFont, resolve_fit};
use super::renderer::TextRenderer;
use crate::types::{Anchor, Horizontal, LabelSettings, Vertical};

/// Top-left corner of the label's layout box, in (possibly fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

impl Origin {
    /// Integer pixel position handed to the draw primitive (floored).
    pub fn to_pixels(self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// Everything needed to draw a label on one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlan {
    pub font: FittedFont,
    pub origin: Origin,
}

fn along_axis(near: bool, far: bool, image: u32, text: u32, offset: u32) -> f64 {
    let (image, text, offset) = (f64::from(image), f64::from(text), f64::from(offset));
    if near {
        offset
    } else if far {
        image - (text + offset)
    } else {
        (image - text) / 2.0
    }
}

/// Compute where to draw a `text_width`×`text_height` label for `anchor`.
pub fn compute_origin(
    anchor: Anchor,
    image_width: u32,
    image_height: u32,
    text_width: u32,
    text_height: u32,
    offset_lr: u32,
    offset_tb: u32,
) -> Origin {
    let h = anchor.horizontal();
    let v = anchor.vertical();
    Origin {
        x: along_axis(
            h == Horizontal::Left,
            h == Horizontal::Right,
            image_width,
            text_width,
            offset_lr,
        ),
        y: along_axis(
            v == Vertical::Top,
            v == Vertical::Bottom,
            image_height,
            text_height,
            offset_tb,
        ),
    }
}

/// Fit the label to an image of the given size, then place it.
pub fn plan_label(
    renderer: &(impl TextRenderer + ?Sized),
    settings: &LabelSettings,
    image_width: u32,
    image_height: u32,
) -> Result<LabelPlan, FitError> {
    let font = resolve_fit(
        renderer,
        &settings.text,
        settings.font_size,
        image_width,
        image_height,
        settings.offset_lr,
        settings.offset_tb,
    )?;
    let origin = compute_origin(
        settings.anchor,
        image_width,
        image_height,
        font.width,
        font.height,
        settings.offset_lr,
        settings.offset_tb,
    );
    Ok(LabelPlan { font, origin })
}
