//! Configuration file support for inkpad.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/inkpad/config.toml`. Settings cover the starting pen,
//! eraser and highlighter, the paper style, stroke file handling and keyboard
//! shortcuts.
//!
//! If no config file exists, the built-in defaults are used.

pub mod enums;
pub mod keybindings;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, CompressionSetting};
pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{BackgroundConfig, DrawingConfig, EraserConfig, HighlighterConfig, PersistenceConfig};

use crate::draw::{AttributeRules, YELLOW};
use crate::input::{Tool, ToolState};
use crate::input::state::{ERASER_SIZE_RANGE, SIZE_RANGE};
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// All fields have defaults and those are used when a section or key is
/// missing from the file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "blue"
/// default_size = 4.0
///
/// [eraser]
/// mode = "by-point"
/// size = 10.0
///
/// [background]
/// style = "rule"
///
/// [keybindings]
/// undo = ["Ctrl+Z"]
/// redo = ["Ctrl+Y"]
/// ```
#[derive(Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Starting pen settings
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Starting eraser settings
    #[serde(default)]
    pub eraser: EraserConfig,

    /// Highlighter tip and color policy
    #[serde(default)]
    pub highlighter: HighlighterConfig,

    /// Paper background
    #[serde(default)]
    pub background: BackgroundConfig,

    /// Stroke file handling
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is
    /// logged.
    ///
    /// Validated ranges:
    /// - `drawing.default_size`: 1.0 - 50.0
    /// - `eraser.size`: 1.0 - 100.0
    /// - `highlighter.size`: 1.0 - 100.0
    /// - `persistence.max_file_size_mb`: at least 1
    fn validate_and_clamp(&mut self) {
        let (min, max) = SIZE_RANGE;
        if !(min..=max).contains(&self.drawing.default_size) {
            log::warn!(
                "Invalid default_size {:.1}, clamping to {:.1}-{:.1} range",
                self.drawing.default_size,
                min,
                max
            );
            self.drawing.default_size = clamp_or_min(self.drawing.default_size, SIZE_RANGE);
        }

        let (min, max) = ERASER_SIZE_RANGE;
        if !(min..=max).contains(&self.eraser.size) {
            log::warn!(
                "Invalid eraser size {:.1}, clamping to {:.1}-{:.1} range",
                self.eraser.size,
                min,
                max
            );
            self.eraser.size = clamp_or_min(self.eraser.size, ERASER_SIZE_RANGE);
        }

        if !(1.0..=100.0).contains(&self.highlighter.size) {
            log::warn!(
                "Invalid highlighter size {:.1}, clamping to 1.0-100.0 range",
                self.highlighter.size
            );
            self.highlighter.size = clamp_or_min(self.highlighter.size, (1.0, 100.0));
        }

        if self.persistence.max_file_size_mb == 0 {
            log::warn!("Invalid max_file_size_mb 0, using 1");
            self.persistence.max_file_size_mb = 1;
        }

        if let Err(err) = self.keybindings.build_action_map() {
            log::warn!("Invalid keybindings ({err}), falling back to defaults");
            self.keybindings = KeybindingsConfig::default();
        }
    }

    /// Starting tool state described by this config.
    pub fn tool_state(&self) -> ToolState {
        ToolState {
            active_tool: Tool::Pen,
            eraser_mode: self.eraser.mode,
            eraser_size: self.eraser.size,
            calligraphy_enabled: self.drawing.calligraphy,
            current_color: self.drawing.default_color.to_color(),
            current_size: self.drawing.default_size,
        }
    }

    /// Highlighter rules described by this config.
    pub fn attribute_rules(&self) -> AttributeRules {
        AttributeRules {
            highlighter_size: self.highlighter.size,
            highlighter_fallback: self.highlighter.fallback_color.to_color_or(YELLOW),
        }
    }

    /// JSON schema of the configuration file.
    pub fn schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/inkpad/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("inkpad");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if it does not exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the config to TOML and writes it to `config_path`,
    /// creating the parent directory if needed.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Writes the documented example config to `config_path`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(())
    }
}

fn clamp_or_min(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}
