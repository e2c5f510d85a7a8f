//! Shared value types: the resolved [`LabelSettings`] and the enumerations it is
//! built from.
//!
//! Every enumeration parses from the same tokens the command line and the
//! config file accept, so both surfaces share a single set of error messages.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a token is not one of an enumeration's accepted values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} '{token}' is not among the accepted values: {}", .accepted.join(", "))]
pub struct ParseTokenError {
    kind: &'static str,
    token: String,
    accepted: &'static [&'static str],
}

/// Where the label sits on the image, as an eight-point compass.
///
/// There is no center position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    T,
    TR,
    R,
    BR,
    B,
    BL,
    L,
    TL,
}

/// Horizontal placement class of an [`Anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

/// Vertical placement class of an [`Anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Middle,
    Bottom,
}

impl Anchor {
    pub const ALL: [Anchor; 8] = [
        Anchor::T,
        Anchor::TR,
        Anchor::R,
        Anchor::BR,
        Anchor::B,
        Anchor::BL,
        Anchor::L,
        Anchor::TL,
    ];

    const TOKENS: &'static [&'static str] = &["T", "TR", "R", "BR", "B", "BL", "L", "TL"];

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::T => "T",
            Anchor::TR => "TR",
            Anchor::R => "R",
            Anchor::BR => "BR",
            Anchor::B => "B",
            Anchor::BL => "BL",
            Anchor::L => "L",
            Anchor::TL => "TL",
        }
    }

    pub fn horizontal(self) -> Horizontal {
        match self {
            Anchor::TL | Anchor::L | Anchor::BL => Horizontal::Left,
            Anchor::T | Anchor::B => Horizontal::Center,
            Anchor::TR | Anchor::R | Anchor::BR => Horizontal::Right,
        }
    }

    pub fn vertical(self) -> Vertical {
        match self {
            Anchor::TL | Anchor::T | Anchor::TR => Vertical::Top,
            Anchor::L | Anchor::R => Vertical::Middle,
            Anchor::BL | Anchor::B | Anchor::BR => Vertical::Bottom,
        }
    }
}

impl FromStr for Anchor {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParseTokenError {
                kind: "label location",
                token: s.to_string(),
                accepted: Anchor::TOKENS,
            })
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named font colors available for labels on color images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontColor {
    Black,
    Blue,
    Green,
    Red,
    White,
    Yellow,
}

impl FontColor {
    pub const ALL: [FontColor; 6] = [
        FontColor::Black,
        FontColor::Blue,
        FontColor::Green,
        FontColor::Red,
        FontColor::White,
        FontColor::Yellow,
    ];

    const TOKENS: &'static [&'static str] = &["black", "blue", "green", "red", "white", "yellow"];

    pub fn as_str(self) -> &'static str {
        match self {
            FontColor::Black => "black",
            FontColor::Blue => "blue",
            FontColor::Green => "green",
            FontColor::Red => "red",
            FontColor::White => "white",
            FontColor::Yellow => "yellow",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            FontColor::Black => [0, 0, 0],
            FontColor::Blue => [0, 0, 255],
            FontColor::Green => [0, 153, 0],
            FontColor::Red => [255, 0, 0],
            FontColor::White => [255, 255, 255],
            FontColor::Yellow => [255, 255, 0],
        }
    }
}

impl FromStr for FontColor {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontColor::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseTokenError {
                kind: "font color",
                token: s.to_string(),
                accepted: FontColor::TOKENS,
            })
    }
}

impl fmt::Display for FontColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding of the altered output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Bmp,
    Jpeg,
    Png,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Bmp, OutputFormat::Jpeg, OutputFormat::Png];

    const TOKENS: &'static [&'static str] = &["BMP", "JPEG", "PNG"];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Bmp => "BMP",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
        }
    }

    /// File extension written after `.altered.`.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Bmp => "bmp",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseTokenError {
                kind: "output format",
                token: s.to_string(),
                accepted: OutputFormat::TOKENS,
            })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clockwise rotation in whole degrees, always within 1..=359.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation(u16);

impl Rotation {
    /// Returns `None` for 0 (no rotation) and for anything outside 1..=359.
    pub fn new(degrees: i64) -> Option<Self> {
        (1..=359)
            .contains(&degrees)
            .then(|| Self(degrees as u16))
    }

    pub fn degrees(self) -> u16 {
        self.0
    }
}

/// JPEG encoding quality, always within 1..=95.
///
/// Values above 95 grow the file without improving the image, so they are
/// rejected rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegQuality(u8);

impl JpegQuality {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 95;

    pub fn new(value: i64) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then(|| Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self(93)
    }
}

/// Fully resolved, validated label settings for one run.
///
/// Built once by [`config::resolve_settings`](crate::config::resolve_settings)
/// and shared read-only across every file.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSettings {
    pub text: String,
    pub font_file: PathBuf,
    /// Starting point for fitting, in pixels of line height.
    pub font_size: u32,
    pub anchor: Anchor,
    pub offset_lr: u32,
    pub offset_tb: u32,
    pub rotate: Option<Rotation>,
    pub font_color: FontColor,
    /// Use black rather than white text on black-and-white images.
    pub black_for_bw: bool,
    pub output_format: OutputFormat,
    pub jpeg_quality: JpegQuality,
}
