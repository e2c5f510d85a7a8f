//! Per-image labeling pipeline.
//!
//! For each input file:
//!
//! ```text
//! decode → rotate (optional) → fit → place → classify color → draw → encode
//! ```
//!
//! Every step after decoding runs on the file's own [`Canvas`]; the only
//! shared state is the read-only [`LabelSettings`] and the renderer, so files
//! are processed on a rayon pool with no locking. A file that fails (cannot
//! be read, label does not fit, cannot be written) is reported and skipped;
//! the rest of the batch still runs.

use crate::label::{
    Canvas, CanvasError, DrawColor, FitError, LabelPlan, TextRenderer, is_monochrome, plan_label,
    select_draw_color,
};
use crate::naming::altered_path;
use crate::types::{FontColor, LabelSettings};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// A failure while labeling one file.
#[derive(Error, Debug)]
#[error("{}: {source}", .path.display())]
pub struct ProcessError {
    pub path: PathBuf,
    #[source]
    pub source: LabelError,
}

impl ProcessError {
    fn new(path: &Path, source: impl Into<LabelError>) -> Self {
        Self {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// What was drawn on a canvas, independent of where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelOutcome {
    pub plan: LabelPlan,
    /// Canvas size the label was fitted to (after rotation).
    pub dimensions: (u32, u32),
    pub monochrome: bool,
    pub color: DrawColor,
}

/// Result of labeling one file.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub outcome: LabelOutcome,
    /// Palette color requested; only drawn when the image is not monochrome.
    pub font_color: FontColor,
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Labeled(LabelReport),
    Failed { source: PathBuf, reason: String },
}

/// Totals for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub labeled: usize,
    pub failed: usize,
}

/// Rotate (if configured), fit, place, pick a color and draw.
///
/// Takes the canvas by value because rotation may replace it with a larger one.
pub fn label_canvas(
    canvas: Canvas,
    settings: &LabelSettings,
    renderer: &(impl TextRenderer + ?Sized),
) -> Result<(Canvas, LabelOutcome), LabelError> {
    let mut canvas = match settings.rotate {
        Some(rotation) => canvas.rotate_clockwise(rotation.degrees()),
        None => canvas,
    };

    let (width, height) = canvas.dimensions();
    let plan = plan_label(renderer, settings, width, height)?;

    let monochrome = is_monochrome(&canvas);
    let color = select_draw_color(monochrome, settings.font_color, settings.black_for_bw);

    let (x, y) = plan.origin.to_pixels();
    renderer.draw(&mut canvas, x, y, plan.font.size, &settings.text, color)?;

    Ok((
        canvas,
        LabelOutcome {
            plan,
            dimensions: (width, height),
            monochrome,
            color,
        },
    ))
}

/// Label one file and write the altered copy next to it.
pub fn label_file(
    source: &Path,
    settings: &LabelSettings,
    renderer: &(impl TextRenderer + ?Sized),
) -> Result<LabelReport, ProcessError> {
    let canvas = Canvas::open(source).map_err(|e| ProcessError::new(source, e))?;
    let (canvas, outcome) =
        label_canvas(canvas, settings, renderer).map_err(|e| ProcessError::new(source, e))?;

    let output = altered_path(source, settings.output_format);
    canvas
        .save(&output, settings.output_format, settings.jpeg_quality)
        .map_err(|e| ProcessError::new(source, e))?;
    log::info!("wrote {}", output.display());

    Ok(LabelReport {
        source: source.to_path_buf(),
        output,
        outcome,
        font_color: settings.font_color,
    })
}

/// Label every file, reporting progress through `events` if given.
///
/// Failures do not stop the batch; they are counted in the summary.
pub fn process_files(
    files: &[PathBuf],
    settings: &LabelSettings,
    renderer: &(impl TextRenderer + ?Sized),
    events: Option<Sender<ProcessEvent>>,
) -> ProcessSummary {
    let labeled: Vec<bool> = files
        .par_iter()
        .map_with(events, |events, path| {
            let event = match label_file(path, settings, renderer) {
                Ok(report) => ProcessEvent::Labeled(report),
                Err(e) => {
                    log::warn!("{e}");
                    ProcessEvent::Failed {
                        source: e.path,
                        reason: e.source.to_string(),
                    }
                }
            };
            let ok = matches!(event, ProcessEvent::Labeled(_));
            if let Some(tx) = events {
                // The receiver going away only means nobody is listening
                let _ = tx.send(event);
            }
            ok
        })
        .collect();

    let done = labeled.iter().filter(|&&ok| ok).count();
    ProcessSummary {
        labeled: done,
        failed: labeled.len() - done,
    }
}
