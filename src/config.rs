//! Thumbnailer configuration.
//!
//! A [`Configuration`] is the immutable value a [`ThumbnailMaker`](crate::ThumbnailMaker)
//! is built with. It can be constructed in code or loaded from a
//! `thumbnailer.toml` file together with the batch [`ProcessingConfig`].
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [thumbnail]
//! # size = { width = 200.0, height = 200.0 }  # omit for full resolution
//! scale = 1.0                # display scale multiplier (> 0)
//! scale_mode = "fill"        # "fill" or "fit"
//! allows_animation = false   # produce animated thumbnails for GIFs
//! # max_animation_frames = 300
//!
//! [processing]
//! # max_processes = 4        # omit for auto = CPU cores
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "thumbnailer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// How a thumbnail relates to the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Cover the whole box; the excess on one axis is cropped later.
    #[default]
    Fill,
    /// Stay entirely inside the box.
    Fit,
}

/// Settings for one thumbnail request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    /// Requested thumbnail size in points. `None` decodes at full resolution.
    /// Ignored when the original image is smaller.
    #[serde(rename = "size", skip_serializing_if = "Option::is_none")]
    pub thumbnail_size: Option<Size>,
    /// Display scale multiplier applied to the point budget.
    pub scale: f64,
    pub scale_mode: ScaleMode,
    /// When false, GIFs always produce a still thumbnail.
    pub allows_animation: bool,
    /// Above this many source frames a still thumbnail is produced instead.
    /// Guards against memory blowups on faulty GIFs. `None` means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_animation_frames: Option<usize>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            thumbnail_size: None,
            scale: 1.0,
            scale_mode: ScaleMode::Fill,
            allows_animation: false,
            max_animation_frames: None,
        }
    }
}

impl Configuration {
    /// Request a thumbnail of the given size with every other setting at its default.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            thumbnail_size: Some(Size::new(width, height)),
            ..Self::default()
        }
    }

    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::Validation(
                "thumbnail.scale must be a positive number".into(),
            ));
        }
        if let Some(size) = self.thumbnail_size {
            let valid = |v: f64| v.is_finite() && v >= 0.0;
            if !valid(size.width) || !valid(size.height) {
                return Err(ConfigError::Validation(
                    "thumbnail.size values must be non-negative numbers".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Parallel processing settings for [`batch`](crate::batch).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel thumbnail workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Shape of a `thumbnailer.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailerConfig {
    pub thumbnail: Configuration,
    pub processing: ProcessingConfig,
}

impl ThumbnailerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thumbnail.validate()
    }
}

/// Parse and validate a config document.
pub fn parse_config(content: &str) -> Result<ThumbnailerConfig, ConfigError> {
    let config: ThumbnailerConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load `thumbnailer.toml` from the given directory.
///
/// Returns the defaults when the file does not exist. Unknown keys are
/// rejected and the result is validated.
pub fn load_config(dir: &Path) -> Result<ThumbnailerConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(ThumbnailerConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `thumbnailer.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Thumbnailer Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Thumbnail generation
# ---------------------------------------------------------------------------
[thumbnail]
# Requested thumbnail size in points. Omit to decode at full resolution.
# If the original image is smaller, this value is ignored.
# size = { width = 200.0, height = 200.0 }

# Display scale multiplier (e.g. 2.0 for a 2x screen). Must be > 0.
scale = 1.0

# "fill" covers the whole box (cropping the excess), "fit" stays inside it.
scale_mode = "fill"

# Produce animated thumbnails for animated GIFs.
allows_animation = false

# Above this many GIF frames a still thumbnail is produced instead.
# Omit for no limit.
# max_animation_frames = 300

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel thumbnail workers for batch runs.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
