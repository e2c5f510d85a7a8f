//! # Image Label
//!
//! Stamps a short text label onto copies of images. The label is fitted to the
//! image (the font shrinks until it fits inside the configured margins),
//! anchored to one of eight edge or corner positions, and drawn in a palette
//! color, or in black or white when the image is black and white. Images can
//! be rotated clockwise before labeling. The original file is never touched;
//! output goes to `<name>.altered.<ext>` next to it.
//!
//! # Pipeline
//!
//! Settings are resolved once, then every file runs the same steps:
//!
//! ```text
//! config layers  →  LabelSettings + LabelFont      (once per run)
//! decode → rotate → fit → place → classify → draw → encode   (per file)
//! ```
//!
//! Files are independent, so the per-file pipeline runs on a rayon pool.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Layered TOML configuration, validation, `--gen-config` output |
//! | [`types`] | Validated settings and the enumerations they are built from |
//! | [`label`] | Canvas, font, fit search, placement and monochrome detection |
//! | [`process`] | Per-file pipeline and the parallel batch driver |
//! | [`naming`] | Output path derivation (`photo.png` → `photo.altered.jpg`) |
//! | [`output`] | CLI output formatting of progress events |
//! | [`logging`] | `log` / `env_logger` setup for diagnostics |
//!
//! # Design Decisions
//!
//! ## Fitting Is Measured, Not Estimated
//!
//! The fit search renders nothing; it asks the font for the pixel extent of
//! the text at each candidate size, from the configured size down to 1, and
//! keeps the first that leaves the margins clear. The search sits behind the
//! [`label::TextRenderer`] trait so tests can drive it with fixed metrics.
//!
//! ## Black and White Stays Black and White
//!
//! An image whose channels have nearly equal variance is treated as black and
//! white and labeled in pure black or white. Grayscale images can only
//! take an intensity; trying to draw RGB onto one is an error rather than a
//! silent conversion.
//!
//! ## Validate Everything Up Front
//!
//! Bad config values and unreadable fonts stop the run before the first image
//! is opened. Per-image problems (an image too small for its margins, a
//! corrupt file) only skip that image.

pub mod config;
pub mod label;
pub mod logging;
pub mod naming;
pub mod output;
pub mod process;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
