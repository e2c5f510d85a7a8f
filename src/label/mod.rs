//! The label engine: fitting, placement, color choice and pixel work.
//!
//! | Step | Module | Crate / function |
//! |---|---|---|
//! | **Fit** | [`fit`] | pure search over [`TextRenderer::measure`] |
//! | **Place** | [`placement`] | pure anchor arithmetic |
//! | **Classify** | [`monochrome`] | per-channel variance |
//! | **Rotate / draw / encode** | [`canvas`] | `image` + `imageproc` |
//! | **Measure / render text** | [`font`] | `ab_glyph` via `imageproc::drawing` |
//!
//! The module is split into:
//! - **Calculations**: fit, placement and classification are pure functions
//!   over dimensions and statistics, unit-testable without fonts or files
//! - **Renderer**: the [`TextRenderer`] trait + [`LabelFont`]
//! - **Canvas**: the owned raster every per-image step mutates

pub mod canvas;
pub mod fit;
pub mod font;
pub mod monochrome;
pub mod placement;
pub mod renderer;

pub use canvas::{Canvas, CanvasError, DrawColor};
pub use fit::{FitError, FittedFont, resolve_fit};
pub use font::{FontError, LabelFont};
pub use monochrome::{is_monochrome, select_draw_color};
pub use placement::{LabelPlan, Origin, compute_origin, plan_label};
pub use renderer::TextRenderer;
