//! CLI output formatting.
//!
//! Each labeled file is shown as a header line (source → output) followed by
//! indented context lines:
//!
//! ```text
//! photos/dawn.png → photos/dawn.altered.jpg
//!     Size: 59 (shrunk from 100)
//!     Position: (40, 30) on 200x100
//!     Color: red
//! photos/scan.png → photos/scan.altered.jpg
//!     Size: 100
//!     Position: (50, 50) on 800x600
//!     Image appears to be black and white, which cannot take RGB text, so using white as text color
//! photos/thumb.png: FAILED
//!     label cannot fit on a 64x64 image with offsets 50px left/right and 50px top/bottom at any font size
//!
//! Labeled 2 images, 1 failed
//! ```
//!
//! Format functions are pure (return `Vec<String>` / `String`, no I/O) for
//! testability; `print_*` wrappers write to stdout.

use crate::label::DrawColor;
use crate::process::{LabelReport, ProcessEvent, ProcessSummary};

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn color_line(report: &LabelReport) -> String {
    match report.outcome.color {
        DrawColor::Intensity(v) => format!(
            "Image appears to be black and white, which cannot take RGB text, so using {} as text color",
            if v == 0 { "black" } else { "white" }
        ),
        DrawColor::Rgb(_) => format!("Color: {}", report.font_color),
    }
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Labeled(report) => {
            let font = report.outcome.plan.font;
            let size = if font.shrunk_by() == 0 {
                format!("Size: {}", font.size)
            } else {
                format!("Size: {} (shrunk from {})", font.size, font.start_size)
            };
            let (x, y) = report.outcome.plan.origin.to_pixels();
            let (w, h) = report.outcome.dimensions;
            vec![
                format!("{} → {}", report.source.display(), report.output.display()),
                format!("{}{}", indent(1), size),
                format!("{}Position: ({x}, {y}) on {w}x{h}", indent(1)),
                format!("{}{}", indent(1), color_line(report)),
            ]
        }
        ProcessEvent::Failed { source, reason } => vec![
            format!("{}: FAILED", source.display()),
            format!("{}{}", indent(1), reason),
        ],
    }
}

/// Final line of a run.
pub fn format_summary(summary: &ProcessSummary) -> String {
    let noun = if summary.labeled == 1 { "image" } else { "images" };
    if summary.failed == 0 {
        format!("Labeled {} {noun}", summary.labeled)
    } else {
        format!("Labeled {} {noun}, {} failed", summary.labeled, summary.failed)
    }
}

/// Config section names on one line, space separated.
pub fn format_sections(names: &[String]) -> String {
    names.join(" ")
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

pub fn print_summary(summary: &ProcessSummary) {
    println!();
    println!("{}", format_summary(summary));
}
