//! Configuration type definitions.

use super::enums::{ColorSpec, CompressionSetting};
use crate::draw::BackgroundStyle;
use crate::input::EraserMode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the pen when a session starts. Users change these at runtime from
/// the toolbar.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - either a named color (red, green, blue, yellow, orange, pink, white, black)
    /// or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default pen size in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_size")]
    pub default_size: f64,

    /// Start with calligraphy mode enabled
    #[serde(default)]
    pub calligraphy: bool,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_size: default_size(),
            calligraphy: false,
        }
    }
}

/// Eraser settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EraserConfig {
    /// Erase whole strokes (`by-stroke`) or only the touched part (`by-point`)
    #[serde(default)]
    pub mode: EraserMode,

    /// Side length of the point eraser in pixels (valid range: 1.0 - 100.0)
    #[serde(default = "default_eraser_size")]
    pub size: f64,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            mode: EraserMode::default(),
            size: default_eraser_size(),
        }
    }
}

/// Highlighter settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HighlighterConfig {
    /// Fixed highlighter tip size in pixels (valid range: 1.0 - 100.0)
    #[serde(default = "default_highlighter_size")]
    pub size: f64,

    /// Color used instead of black, which a highlighter cannot show
    #[serde(default = "default_highlighter_fallback")]
    pub fallback_color: ColorSpec,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            size: default_highlighter_size(),
            fallback_color: default_highlighter_fallback(),
        }
    }
}

/// Paper background settings.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct BackgroundConfig {
    /// Paper style at startup (none, rule, grid)
    #[serde(default)]
    pub style: BackgroundStyle,
}

/// Stroke file settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PersistenceConfig {
    /// Gzip compression for saved files (off, on, auto)
    #[serde(default)]
    pub compress: CompressionSetting,

    /// Payload size in KiB above which `auto` compresses
    #[serde(default = "default_auto_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,

    /// Files larger than this are refused on load and not written on save
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            compress: CompressionSetting::default(),
            auto_compress_threshold_kb: default_auto_compress_threshold_kb(),
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_size() -> f64 {
    4.0
}

fn default_eraser_size() -> f64 {
    10.0
}

fn default_highlighter_size() -> f64 {
    20.0
}

fn default_highlighter_fallback() -> ColorSpec {
    ColorSpec::Name("yellow".to_string())
}

fn default_auto_compress_threshold_kb() -> u64 {
    100
}

fn default_max_file_size_mb() -> u64 {
    10
}
