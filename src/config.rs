//! Label configuration: loading, layering and validation.
//!
//! Settings are resolved once per run from four layers, later layers winning:
//!
//! ```text
//! 1. built-in defaults             (LabelConfig::default)
//! 2. [defaults] table              (config file)
//! 3. [<name>] table                (config file, selected with --setting NAME)
//! 4. command-line flags            (Overrides)
//! ```
//!
//! The config file is TOML, found through `--config` or the
//! `IMAGE_LABEL_CONFIG` environment variable:
//!
//! ```toml
//! [defaults]
//! font_file = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"
//! font_color = "white"
//!
//! [watermark]
//! label_text = "(c) 2026 Example Studio"
//! label_location = "BR"
//! label_offset_lr = 20
//! label_offset_tb = 20
//!
//! [archive]
//! label_text = "ARCHIVE COPY"
//! rotate = 90
//! output_format = "PNG"
//! ```
//!
//! Tables are sparse: each one only names the keys it changes. Unknown keys
//! are rejected to catch typos early. The merged result is validated into an
//! immutable [`LabelSettings`] before any image is opened.

use crate::label::{FontError, LabelFont};
use crate::types::{Anchor, FontColor, JpegQuality, LabelSettings, OutputFormat, Rotation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest accepted starting font size. The fit search measures every size
/// below it, so this also bounds the work spent on an image that cannot fit.
pub const MAX_FONT_SIZE: u32 = 10_000;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "IMAGE_LABEL_CONFIG";

/// Table applied on top of the built-in defaults for every run.
pub const DEFAULTS_SECTION: &str = "defaults";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("setting '{0}' is not a section of the config file")]
    UnknownSection(String),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Font(#[from] FontError),
}

/// A boolean that also accepts the exact strings `True`, `False`, `true`
/// and `false`, and nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoolToken", into = "bool")]
pub struct StrictBool(pub bool);

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolToken {
    Bool(bool),
    Text(String),
}

impl TryFrom<BoolToken> for StrictBool {
    type Error = String;

    fn try_from(token: BoolToken) -> Result<Self, Self::Error> {
        match token {
            BoolToken::Bool(b) => Ok(StrictBool(b)),
            BoolToken::Text(s) => parse_strict_bool(&s).map(StrictBool),
        }
    }
}

impl From<StrictBool> for bool {
    fn from(b: StrictBool) -> bool {
        b.0
    }
}

/// Parse `True`/`true`/`False`/`false`; any other token is an error.
pub fn parse_strict_bool(token: &str) -> Result<bool, String> {
    match token {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        other => Err(format!(
            "'{other}' is not a boolean, use true or false"
        )),
    }
}

/// Raw, unvalidated label configuration as it appears in a config table.
///
/// Numbers are kept signed and enumerations as strings so that out-of-range
/// values produce a validation message naming the key, not a TOML type error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    /// Text of the label.
    pub label_text: String,
    /// One of T, TR, R, BR, B, BL, L, TL.
    pub label_location: String,
    /// Palette color used on color images.
    pub font_color: String,
    /// TrueType font used to render the label.
    pub font_file: PathBuf,
    /// Starting font size; shrunk automatically until the label fits.
    pub font_size: i64,
    /// Pixels kept clear to the left and right of the label.
    pub label_offset_lr: i64,
    /// Pixels kept clear above and below the label.
    pub label_offset_tb: i64,
    /// Clockwise rotation applied before labeling (1-359, 0 = none).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<i64>,
    /// JPEG quality (1-95); ignored by BMP and PNG.
    pub jpg_quality: i64,
    /// Black instead of white text on black-and-white images.
    pub black_for_bw: StrictBool,
    /// BMP, JPEG or PNG.
    pub output_format: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            label_text: "DEFAULT TEXT".to_string(),
            label_location: Anchor::TL.to_string(),
            font_color: FontColor::Red.to_string(),
            font_file: PathBuf::from("./open-sans/OpenSans-Bold.ttf"),
            font_size: 100,
            label_offset_lr: 50,
            label_offset_tb: 50,
            rotate: None,
            jpg_quality: i64::from(JpegQuality::default().value()),
            black_for_bw: StrictBool(false),
            output_format: OutputFormat::Jpeg.to_string(),
        }
    }
}

fn validation(message: impl ToString) -> ConfigError {
    ConfigError::Validation(message.to_string())
}

fn non_negative(key: &str, value: i64) -> Result<u32, ConfigError> {
    u32::try_from(value)
        .map_err(|_| validation(format!("{key} must be a non-negative integer, got {value}")))
}

impl LabelConfig {
    /// Validate every value and build the immutable settings.
    pub fn validate(&self) -> Result<LabelSettings, ConfigError> {
        if self.label_text.is_empty() {
            return Err(validation("label_text must not be empty"));
        }
        let anchor: Anchor = self.label_location.parse().map_err(validation)?;
        let font_color: FontColor = self.font_color.parse().map_err(validation)?;
        let output_format: OutputFormat = self.output_format.parse().map_err(validation)?;

        let font_size = u32::try_from(self.font_size)
            .ok()
            .filter(|s| (1..=MAX_FONT_SIZE).contains(s))
            .ok_or_else(|| {
                validation(format!(
                    "font_size must be between 1-{MAX_FONT_SIZE}, got {}",
                    self.font_size
                ))
            })?;
        let offset_lr = non_negative("label_offset_lr", self.label_offset_lr)?;
        let offset_tb = non_negative("label_offset_tb", self.label_offset_tb)?;

        let rotate = match self.rotate {
            None | Some(0) => None,
            Some(degrees) => Some(Rotation::new(degrees).ok_or_else(|| {
                validation(format!("rotate must be between 1-359 inclusive, got {degrees}"))
            })?),
        };

        let jpeg_quality = JpegQuality::new(self.jpg_quality).ok_or_else(|| {
            validation(format!(
                "jpg_quality must be between {}-{}, got {}",
                JpegQuality::MIN,
                JpegQuality::MAX,
                self.jpg_quality
            ))
        })?;

        Ok(LabelSettings {
            text: self.label_text.clone(),
            font_file: self.font_file.clone(),
            font_size,
            anchor,
            offset_lr,
            offset_tb,
            rotate,
            font_color,
            black_for_bw: self.black_for_bw.0,
            output_format,
            jpeg_quality,
        })
    }
}

/// Command-line values that override every config layer when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub label_text: Option<String>,
    pub label_location: Option<Anchor>,
    pub font_color: Option<FontColor>,
    pub font_file: Option<PathBuf>,
    pub font_size: Option<u32>,
    pub label_offset_lr: Option<u32>,
    pub label_offset_tb: Option<u32>,
    pub rotate: Option<i64>,
    pub jpg_quality: Option<i64>,
    /// Only `Some(true)` from a flag; absence leaves the config value alone.
    pub black_for_bw: Option<bool>,
    pub output_format: Option<OutputFormat>,
}

impl Overrides {
    /// The overrides as a sparse TOML table, ready to merge.
    pub fn to_table(&self) -> toml::Table {
        let mut table = toml::Table::new();
        let mut set = |key: &str, value: Option<toml::Value>| {
            if let Some(v) = value {
                table.insert(key.to_string(), v);
            }
        };
        set("label_text", self.label_text.clone().map(toml::Value::from));
        set(
            "label_location",
            self.label_location.map(|a| a.as_str().into()),
        );
        set("font_color", self.font_color.map(|c| c.as_str().into()));
        set(
            "font_file",
            self.font_file
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned().into()),
        );
        set("font_size", self.font_size.map(|v| i64::from(v).into()));
        set(
            "label_offset_lr",
            self.label_offset_lr.map(|v| i64::from(v).into()),
        );
        set(
            "label_offset_tb",
            self.label_offset_tb.map(|v| i64::from(v).into()),
        );
        set("rotate", self.rotate.map(toml::Value::from));
        set("jpg_quality", self.jpg_quality.map(toml::Value::from));
        set("black_for_bw", self.black_for_bw.map(toml::Value::from));
        set(
            "output_format",
            self.output_format.map(|f| f.as_str().into()),
        );
        table
    }
}

// =============================================================================
// Loading, merging, and resolution
// =============================================================================

/// Returns the built-in defaults as a `toml::Value::Table`, the base layer for
/// merging.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(LabelConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file into its top-level table.
///
/// Every top-level entry must be a table (a section); stray keys are an error.
pub fn load_config_file(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&content)?;
    if let Some((key, _)) = table.iter().find(|(_, v)| !v.is_table()) {
        return Err(validation(format!(
            "'{key}' in {} must be inside a section such as [{DEFAULTS_SECTION}]",
            path.display()
        )));
    }
    Ok(table)
}

/// Sorted names of every section in a config file.
pub fn section_names(file: &toml::Table) -> Vec<String> {
    let mut names: Vec<String> = file.keys().cloned().collect();
    names.sort();
    names
}

/// Merge every layer and validate the result.
///
/// `section` names a table of `file`; it is an error if there is no file or
/// the file has no such table.
pub fn resolve_settings(
    file: Option<&toml::Table>,
    section: Option<&str>,
    overrides: &Overrides,
) -> Result<LabelSettings, ConfigError> {
    let mut merged = stock_defaults_value();

    if let Some(defaults) = file.and_then(|f| f.get(DEFAULTS_SECTION)) {
        merged = merge_toml(merged, defaults.clone());
    }

    if let Some(name) = section {
        let table = file
            .and_then(|f| f.get(name))
            .ok_or_else(|| ConfigError::UnknownSection(name.to_string()))?;
        log::debug!("applying config section [{name}]");
        merged = merge_toml(merged, table.clone());
    }

    merged = merge_toml(merged, toml::Value::Table(overrides.to_table()));

    let config: LabelConfig = merged.try_into()?;
    config.validate()
}

/// Load the font named by the settings, as part of configuration checking.
pub fn load_font(settings: &LabelSettings) -> Result<LabelFont, ConfigError> {
    Ok(LabelFont::load(&settings.font_file)?)
}

/// Worker count for the labeling pool: `jobs` clamped to `1..=cores`.
///
/// Users can constrain parallelism down, not up.
pub fn effective_threads(jobs: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    jobs.clamp(1, cores)
}

/// Returns a fully-commented stock config file with every key and its default.
///
/// Used by the `--gen-config` flag.
pub fn stock_config_toml() -> &'static str {
    r##"# image-label configuration
# =========================
# Point IMAGE_LABEL_CONFIG (or --config) at this file.
#
# Settings are layered, later layers winning:
#   built-in defaults -> [defaults] -> [<name>] chosen with --setting NAME -> command-line flags
#
# Each section only needs the keys it wants to change.
# Unknown keys will cause an error.

[defaults]
# Text of the label.
label_text = "DEFAULT TEXT"

# Where the label goes: T, TR, R, BR, B, BL, L or TL.
label_location = "TL"

# Text color on color images: red, blue, green, yellow, black or white.
font_color = "red"

# TrueType font file used to render the label.
font_file = "./open-sans/OpenSans-Bold.ttf"

# Starting font size (1-10000). It is reduced automatically until the label
# fits.
font_size = 100

# Pixels kept clear between the label and the left/right image edges.
label_offset_lr = 50

# Pixels kept clear between the label and the top/bottom image edges.
label_offset_tb = 50

# Degrees to rotate the image clockwise before labeling (1-359).
# rotate = 90

# JPEG quality (1-95). Higher values grow the file but cannot improve on the
# source image.
jpg_quality = 93

# Black-and-white images cannot take colored text. Use black (true) or
# white (false) text on them.
black_for_bw = false

# Output format: BMP, JPEG or PNG.
output_format = "JPEG"

# ---------------------------------------------------------------------------
# Named settings, applied with --setting NAME
# ---------------------------------------------------------------------------
# [watermark]
# label_text = "(c) Example Studio"
# label_location = "BR"
# font_color = "white"
# label_offset_lr = 20
# label_offset_tb = 20
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(99999), cores);
        assert_eq!(effective_threads(1), 1);
        assert_eq!(effective_threads(0), 1);
    }

    fn parse(toml: &str) -> toml::Table {
        toml::from_str(toml).unwrap()
    }

    // =========================================================================
    // Defaults and layering
    // =========================================================================

    #[test]
    fn builtin_defaults() {
        let s = resolve_settings(None, None, &Overrides::default()).unwrap();
        assert_eq!(s.text, "DEFAULT TEXT");
        assert_eq!(s.anchor, Anchor::TL);
        assert_eq!(s.font_color, FontColor::Red);
        assert_eq!(s.font_file, PathBuf::from("./open-sans/OpenSans-Bold.ttf"));
        assert_eq!(s.font_size, 100);
        assert_eq!((s.offset_lr, s.offset_tb), (50, 50));
        assert_eq!(s.rotate, None);
        assert_eq!(s.jpeg_quality.value(), 93);
        assert!(!s.black_for_bw);
        assert_eq!(s.output_format, OutputFormat::Jpeg);
    }

    #[test]
    fn layers_apply_in_order() {
        let file = parse(
            r#"
[defaults]
label_text = "from defaults"
font_color = "blue"
font_size = 80

[watermark]
label_text = "from section"
label_location = "BR"
"#,
        );
        let overrides = Overrides {
            font_size: Some(42),
            ..Default::default()
        };
        let s = resolve_settings(Some(&file), Some("watermark"), &overrides).unwrap();
        assert_eq!(s.text, "from section");
        assert_eq!(s.anchor, Anchor::BR);
        assert_eq!(s.font_color, FontColor::Blue);
        assert_eq!(s.font_size, 42);
        // Untouched keys keep the built-in default
        assert_eq!(s.offset_lr, 50);
    }

    #[test]
    fn defaults_section_applies_without_setting() {
        let file = parse("[defaults]\nlabel_location = \"B\"\n\n[other]\nlabel_location = \"T\"\n");
        let s = resolve_settings(Some(&file), None, &Overrides::default()).unwrap();
        assert_eq!(s.anchor, Anchor::B);
    }

    #[test]
    fn cli_overrides_every_key() {
        let file = parse("[defaults]\nblack_for_bw = false\nrotate = 10\n");
        let overrides = Overrides {
            label_text: Some("cli".into()),
            label_location: Some(Anchor::R),
            font_color: Some(FontColor::Yellow),
            font_file: Some(PathBuf::from("/fonts/x.ttf")),
            font_size: Some(12),
            label_offset_lr: Some(0),
            label_offset_tb: Some(3),
            rotate: Some(270),
            jpg_quality: Some(80),
            black_for_bw: Some(true),
            output_format: Some(OutputFormat::Png),
        };
        let s = resolve_settings(Some(&file), None, &overrides).unwrap();
        assert_eq!(
            s,
            LabelSettings {
                text: "cli".into(),
                font_file: PathBuf::from("/fonts/x.ttf"),
                font_size: 12,
                anchor: Anchor::R,
                offset_lr: 0,
                offset_tb: 3,
                rotate: Rotation::new(270),
                font_color: FontColor::Yellow,
                black_for_bw: true,
                output_format: OutputFormat::Png,
                jpeg_quality: JpegQuality::new(80).unwrap(),
            }
        );
    }

    #[test]
    fn unknown_section_is_error() {
        let file = parse("[defaults]\n");
        let err = resolve_settings(Some(&file), Some("missing"), &Overrides::default());
        assert!(matches!(err, Err(ConfigError::UnknownSection(name)) if name == "missing"));

        let err = resolve_settings(None, Some("any"), &Overrides::default());
        assert!(matches!(err, Err(ConfigError::UnknownSection(_))));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let file = parse("[defaults]\nlabel_colour = \"red\"\n");
        let err = resolve_settings(Some(&file), None, &Overrides::default());
        assert!(matches!(err, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn rotate_zero_means_no_rotation() {
        let file = parse("[defaults]\nrotate = 0\n");
        let s = resolve_settings(Some(&file), None, &Overrides::default()).unwrap();
        assert_eq!(s.rotate, None);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn validate_one(toml_line: &str) -> Result<LabelSettings, ConfigError> {
        let file = parse(&format!("[defaults]\n{toml_line}\n"));
        resolve_settings(Some(&file), None, &Overrides::default())
    }

    fn validation_message(toml_line: &str) -> String {
        match validate_one(toml_line) {
            Err(ConfigError::Validation(msg)) => msg,
            other => panic!("expected validation error for {toml_line}, got {other:?}"),
        }
    }

    #[test]
    fn invalid_enumerations() {
        assert!(validation_message("label_location = \"C\"").contains("label location"));
        assert!(validation_message("font_color = \"purple\"").contains("font color"));
        assert!(validation_message("output_format = \"GIF\"").contains("output format"));
    }

    #[test]
    fn out_of_range_numbers() {
        assert!(validation_message("rotate = 360").contains("rotate"));
        assert!(validation_message("rotate = -5").contains("rotate"));
        assert!(validation_message("jpg_quality = 0").contains("jpg_quality"));
        assert!(validation_message("jpg_quality = 96").contains("jpg_quality"));
        assert!(validation_message("font_size = 0").contains("font_size"));
        assert!(validation_message("font_size = 10001").contains("font_size"));
        assert!(validation_message("font_size = 4000000000").contains("font_size"));
        assert!(validate_one("font_size = 10000").is_ok());
        assert!(validation_message("label_offset_lr = -1").contains("label_offset_lr"));
        assert!(validation_message("label_offset_tb = -1").contains("label_offset_tb"));
    }

    #[test]
    fn empty_label_text_is_rejected() {
        assert!(validation_message("label_text = \"\"").contains("label_text"));
    }

    #[test]
    fn lowercase_output_format_is_accepted() {
        let s = validate_one("output_format = \"png\"").unwrap();
        assert_eq!(s.output_format, OutputFormat::Png);
    }

    // =========================================================================
    // Strict booleans
    // =========================================================================

    #[test]
    fn black_for_bw_accepts_booleans_and_exact_words() {
        for (line, expected) in [
            ("black_for_bw = true", true),
            ("black_for_bw = false", false),
            ("black_for_bw = \"True\"", true),
            ("black_for_bw = \"False\"", false),
            ("black_for_bw = \"true\"", true),
        ] {
            assert_eq!(validate_one(line).unwrap().black_for_bw, expected, "{line}");
        }
    }

    #[test]
    fn black_for_bw_rejects_other_tokens() {
        for line in [
            "black_for_bw = \"yes\"",
            "black_for_bw = \"TRUE\"",
            "black_for_bw = \"1\"",
            "black_for_bw = 1",
        ] {
            assert!(validate_one(line).is_err(), "{line}");
        }
    }

    #[test]
    fn parse_strict_bool_tokens() {
        assert_eq!(parse_strict_bool("True"), Ok(true));
        assert_eq!(parse_strict_bool("false"), Ok(false));
        assert!(parse_strict_bool("on").is_err());
    }

    // =========================================================================
    // Files and sections
    // =========================================================================

    #[test]
    fn load_config_file_and_list_sections() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels.toml");
        fs::write(&path, "[zeta]\n[defaults]\n[alpha]\nlabel_text = \"a\"\n").unwrap();
        let file = load_config_file(&path).unwrap();
        assert_eq!(section_names(&file), vec!["alpha", "defaults", "zeta"]);
    }

    #[test]
    fn top_level_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels.toml");
        fs::write(&path, "label_text = \"loose\"\n").unwrap();
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let result = load_config_file(Path::new("/nonexistent/labels.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config_file(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_font_reports_missing_file() {
        let s = resolve_settings(None, None, &Overrides::default()).unwrap();
        let settings = LabelSettings {
            font_file: PathBuf::from("/nonexistent/font.ttf"),
            ..s
        };
        assert!(matches!(load_font(&settings), Err(ConfigError::Font(_))));
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_matches_builtin_defaults() {
        let file: toml::Table = toml::from_str(stock_config_toml()).unwrap();
        let from_file = resolve_settings(Some(&file), None, &Overrides::default()).unwrap();
        let builtin = resolve_settings(None, None, &Overrides::default()).unwrap();
        assert_eq!(from_file, builtin);
        assert_eq!(section_names(&file), vec![DEFAULTS_SECTION]);
    }

    #[test]
    fn stock_defaults_value_omits_rotation() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        assert!(!table.contains_key("rotate"));
        assert_eq!(table["black_for_bw"], toml::Value::Boolean(false));
    }
}
