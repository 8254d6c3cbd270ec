// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language
//! - `[export]` - Output scale, PNG quality, file naming, download folder, background
//! - `[editor]` - Zoom behavior of the photo viewport
//! - `[frame]` - Template background and credit line
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `PHOTOFRAME_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use goru_frame::app::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! config.general.language = Some("bn".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::frame::{ExportQuality, ExportScale};
use crate::error::{Error, Result};
use crate::media::composition::{FrameLayout, RgbaColor};
use crate::media::rasterizer::RasterOptions;
use crate::ui::state::ZoomPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language (e.g., "en-US", "bn").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Settings applied to every exported PNG.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Pixel density multiplier (1.0 to 8.0).
    #[serde(
        default = "default_export_scale",
        skip_serializing_if = "Option::is_none"
    )]
    pub scale: Option<f32>,

    /// PNG quality hint (0.0 to 1.0); higher values compress harder.
    #[serde(
        default = "default_export_quality",
        skip_serializing_if = "Option::is_none"
    )]
    pub quality: Option<f32>,

    /// File stem used when the caption is blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_file_stem: Option<String>,

    /// Destination folder. Defaults to the platform downloads folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// Canvas fill behind every layer, e.g. `"#ffffff"`. Unset keeps transparency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<RgbaColor>,

    /// Load images from outside the config directory as trusted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cors: Option<bool>,

    /// Without `use_cors`, still draw outside images but refuse to encode
    /// the result. When both are off such images are skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_taint: Option<bool>,

    /// Print per-layer render timings to stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<bool>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: default_export_scale(),
            quality: default_export_quality(),
            default_file_stem: None,
            download_dir: None,
            background_color: None,
            use_cors: None,
            allow_taint: None,
            logging: None,
        }
    }
}

/// Photo viewport behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Clamp the photo offset as soon as the zoom shrinks, instead of on the
    /// next drag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclamp_on_zoom: Option<bool>,

    /// Zoom change per mouse wheel notch.
    #[serde(
        default = "default_wheel_zoom_step",
        skip_serializing_if = "Option::is_none"
    )]
    pub zoom_step: Option<f32>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            reclamp_on_zoom: None,
            zoom_step: default_wheel_zoom_step(),
        }
    }
}

/// Frame artwork.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FrameConfig {
    /// Template image (SVG or raster) drawn behind the photo. Unset uses the
    /// bundled template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Draw the small credit line in the bottom-right corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_credit: Option<bool>,
}

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub frame: FrameConfig,
}

impl Config {
    /// Rasterizer options for exported files.
    #[must_use]
    pub fn raster_options(&self) -> RasterOptions {
        let defaults = RasterOptions::default();
        RasterOptions {
            use_cors: self.export.use_cors.unwrap_or(defaults.use_cors),
            allow_taint: self.export.allow_taint.unwrap_or(defaults.allow_taint),
            background: self.export.background_color,
            scale: ExportScale::new(self.export.scale.unwrap_or(DEFAULT_EXPORT_SCALE)),
            quality: ExportQuality::new(self.export.quality.unwrap_or(DEFAULT_EXPORT_QUALITY)),
            logging: self.export.logging.unwrap_or(defaults.logging),
        }
    }

    /// Options for the on-screen preview: export rules at layout density,
    /// without timing output.
    #[must_use]
    pub fn preview_options(&self) -> RasterOptions {
        RasterOptions {
            scale: ExportScale::new(1.0),
            logging: false,
            ..self.raster_options()
        }
    }

    /// Configured template, with relative paths resolved against `config_dir`.
    #[must_use]
    pub fn template_path(&self, config_dir: Option<&Path>) -> Option<PathBuf> {
        let template = self.frame.template.as_ref()?;
        match config_dir {
            Some(dir) if template.is_relative() => Some(dir.join(template)),
            _ => Some(template.clone()),
        }
    }

    /// Stem used for the exported file when the caption is blank.
    #[must_use]
    pub fn default_file_stem(&self) -> &str {
        self.export
            .default_file_stem
            .as_deref()
            .map(str::trim)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(DEFAULT_FILE_STEM)
    }

    #[must_use]
    pub fn zoom_policy(&self) -> ZoomPolicy {
        ZoomPolicy::from_reclamp_flag(self.editor.reclamp_on_zoom.unwrap_or(false))
    }

    /// Wheel zoom step, clamped to a usable range.
    #[must_use]
    pub fn wheel_zoom_step(&self) -> f32 {
        let step = self
            .editor
            .zoom_step
            .filter(|step| step.is_finite())
            .unwrap_or(DEFAULT_WHEEL_ZOOM_STEP);
        step.clamp(MIN_WHEEL_ZOOM_STEP, MAX_WHEEL_ZOOM_STEP)
    }

    /// Frame geometry, with the credit line removed when disabled.
    #[must_use]
    pub fn frame_layout(&self) -> FrameLayout {
        let mut layout = FrameLayout::default();
        if !self.frame.show_credit.unwrap_or(true) {
            layout.credit = None;
        }
        layout
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_export_scale() -> Option<f32> {
    Some(DEFAULT_EXPORT_SCALE)
}

fn default_export_quality() -> Option<f32> {
    Some(DEFAULT_EXPORT_QUALITY)
}

fn default_wheel_zoom_step() -> Option<f32> {
    Some(DEFAULT_WHEEL_ZOOM_STEP)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with the i18n key of a warning to show.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from `base_dir` (or the default location).
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    eprintln!("Failed to load {}: {}", path.display(), err);
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
///
/// # Errors
///
/// Returns an error if no config directory can be determined or the file
/// cannot be written.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration into `base_dir` (or the default location).
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    let path = get_config_path_with_override(base_dir)
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
    save_to_path(config, &path)
}

/// Writes `config` to the default location unless a settings file already
/// exists, so first-time users get an editable file. Returns whether a file
/// was written.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_if_missing(config: &Config) -> Result<bool> {
    save_if_missing_with_override(config, None)
}

pub fn save_if_missing_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<bool> {
    let path = get_config_path_with_override(base_dir)
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
    if path.exists() {
        return Ok(false);
    }
    save_to_path(config, &path)?;
    Ok(true)
}

/// Saves the configuration to a specific file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
